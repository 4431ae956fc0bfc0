//! Salary label normalization
//!
//! France Travail exposes salaries as free text, e.g.:
//!
//! - `"Mensuel de 1923.00 Euros sur 12 mois"`
//! - `"Annuel de 36000 Euros"`
//! - `"Horaire de 12,50 Euros"`
//!
//! The label is classified by unit keyword and its first numeral is converted
//! to a monthly equivalent. The heuristic is intentionally simple and must stay
//! stable: stored averages depend on it.

use super::round2;

/// Working hours assumed per month for hourly salaries
pub const HOURS_PER_MONTH: f64 = 150.0;

/// Months per year for annual salaries
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Pay period detected in a salary label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryUnit {
    /// "mensuel", or no recognised keyword
    Monthly,
    /// "annuel"
    Annual,
    /// "horaire"
    Hourly,
}

impl SalaryUnit {
    /// Classify a label by keyword; annual wins over hourly, monthly is the default
    pub fn detect(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("annuel") {
            SalaryUnit::Annual
        } else if lower.contains("horaire") {
            SalaryUnit::Hourly
        } else {
            SalaryUnit::Monthly
        }
    }

    /// Convert an amount expressed in this unit to a monthly amount
    pub fn to_monthly(self, amount: f64) -> f64 {
        match self {
            SalaryUnit::Annual => amount / MONTHS_PER_YEAR,
            SalaryUnit::Hourly => amount * HOURS_PER_MONTH,
            SalaryUnit::Monthly => amount,
        }
    }
}

/// Extract the first numeral of a label
///
/// Matches `digits[.,]digits` or plain `digits`. A comma is a decimal
/// separator; the returned slice keeps the original separator. A minus sign
/// glued to the numeral is kept so negative amounts can be rejected.
pub fn first_numeral(label: &str) -> Option<&str> {
    let bytes = label.as_bytes();
    let digits_start = bytes.iter().position(u8::is_ascii_digit)?;
    let start = if digits_start > 0 && bytes[digits_start - 1] == b'-' {
        digits_start - 1
    } else {
        digits_start
    };

    let mut end = digits_start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    if end + 1 < bytes.len() && matches!(bytes[end], b'.' | b',') && bytes[end + 1].is_ascii_digit()
    {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    Some(&label[start..end])
}

/// Normalize a salary label to a monthly amount rounded to two decimals
///
/// Returns `None` when the label is absent or empty, holds no numeral, or
/// its first numeral is not strictly positive.
pub fn monthly_salary(label: Option<&str>) -> Option<f64> {
    let label = label.filter(|l| !l.trim().is_empty())?;

    let unit = SalaryUnit::detect(label);
    let raw = first_numeral(label)?;

    let amount: f64 = match raw.replace(',', ".").parse() {
        Ok(amount) => amount,
        Err(_) => return None,
    };

    if amount <= 0.0 {
        return None;
    }

    Some(round2(unit.to_monthly(amount)))
}
