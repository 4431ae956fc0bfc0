//! Per-code aggregation of an offer sample
//!
//! The sample is at most one API page (150 offers) while `offer_count`
//! carries the total reported upstream, so the averages describe the sample
//! and the count describes the market.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::round2;
use super::salary::monthly_salary;
use crate::{OfferRecord, OfferStats};

/// Keyword flagging an urgent offer, matched case-insensitively
pub const URGENT_KEYWORD: &str = "urgent";

/// Compute the indicators for one classification code
///
/// # Arguments
/// * `offers` - Sample of offers fetched for the code
/// * `reported_total` - Total offers reported upstream, if known
/// * `now` - Reference instant for listing age
pub fn aggregate(offers: &[OfferRecord], reported_total: Option<u64>, now: DateTime<Utc>) -> OfferStats {
    let sample_count = offers.len();
    let offer_count = reported_total.unwrap_or(sample_count as u64);

    if sample_count == 0 {
        return OfferStats {
            avg_salary: None,
            urgent_rate: 0.0,
            avg_days_open: None,
            offer_count,
        };
    }

    let salaries: Vec<f64> = offers
        .iter()
        .filter_map(|offer| monthly_salary(offer.salary_label.as_deref()))
        .collect();

    let urgent_count = offers.iter().filter(|offer| is_urgent(offer)).count();
    let urgent_rate = round2(urgent_count as f64 / sample_count as f64 * 100.0);

    let days_open: Vec<f64> = offers
        .iter()
        .filter_map(|offer| days_open(offer, now))
        .map(|days| days as f64)
        .collect();

    debug!(
        sample = sample_count,
        with_salary = salaries.len(),
        urgent = urgent_count,
        dated = days_open.len(),
        "Aggregated offer sample"
    );

    OfferStats {
        avg_salary: mean(&salaries).map(round2),
        urgent_rate,
        avg_days_open: mean(&days_open).map(round2),
        offer_count,
    }
}

/// Whether the title or description mentions "urgent", in any case
pub fn is_urgent(offer: &OfferRecord) -> bool {
    let text = format!(
        "{} {}",
        offer.title,
        offer.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    text.contains(URGENT_KEYWORD)
}

/// Whole days between the offer's creation date and `now`
///
/// Negative when the creation date lies in the future.
pub fn days_open(offer: &OfferRecord, now: DateTime<Utc>) -> Option<i64> {
    offer.created_at.map(|created| (now - created).num_days())
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
