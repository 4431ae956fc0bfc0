//! Offer statistics
//!
//! Pure functions turning a sample of [`crate::OfferRecord`] into the four
//! indicators recorded per classification code:
//!
//! - [`salary`] - Free-text salary label to monthly amount
//! - [`aggregate`] - Average salary, urgent rate, listing age, offer count

use rust_decimal::{Decimal, RoundingStrategy};

pub mod aggregate;
pub mod salary;

pub use aggregate::aggregate;
pub use salary::{monthly_salary, SalaryUnit};

/// Round to two decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert an indicator to a two-decimal [`Decimal`]
///
/// Returns `None` for NaN or infinite values.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
