//! France Travail response parser
//!
//! Stateless functions turning API JSON into [`ClassificationCode`] and
//! [`OfferRecord`] values. Offers are parsed leniently: a missing or
//! malformed field only removes that data point, never the offer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::fetcher::{FetcherError, FetcherResult};
use crate::{ClassificationCode, OfferRecord};

/// Stateless parser for France Travail API responses
pub struct FranceTravailParser;

impl FranceTravailParser {
    /// Parse the catalog response (`[{code, libelle}, ...]`)
    ///
    /// Entries with an absent or empty `code` are dropped. Order and
    /// duplicates are preserved. An empty body yields an empty catalog.
    ///
    /// # Errors
    /// Returns `FetcherError::InvalidResponse` if the body is not an array
    pub fn parse_catalog(body: &Value) -> FetcherResult<Vec<ClassificationCode>> {
        let entries = match body {
            Value::Null => return Ok(Vec::new()),
            Value::Array(entries) => entries,
            other => {
                return Err(FetcherError::InvalidResponse(format!(
                    "expected catalog array, got {}",
                    json_kind(other)
                )))
            }
        };

        let codes: Vec<ClassificationCode> = entries
            .iter()
            .filter_map(|entry| {
                let code = entry.get("code").and_then(Value::as_str)?;
                if code.is_empty() {
                    return None;
                }
                let label = entry
                    .get("libelle")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(ClassificationCode::new(code, label))
            })
            .collect();

        if codes.len() < entries.len() {
            debug!(
                dropped = entries.len() - codes.len(),
                "Dropped catalog entries without a code"
            );
        }

        Ok(codes)
    }

    /// Parse an offer-search response body
    ///
    /// Offers are read from `resultats`, or from the body itself when it is a
    /// bare array. Any other shape yields an empty sample.
    pub fn parse_offers(code: &str, body: &Value) -> Vec<OfferRecord> {
        let raw = body.get("resultats").unwrap_or(body);
        match raw.as_array() {
            Some(offers) => offers.iter().map(|offer| Self::parse_offer(code, offer)).collect(),
            None => {
                if !raw.is_null() {
                    debug!(code, kind = json_kind(raw), "Offer search body holds no offer array");
                }
                Vec::new()
            }
        }
    }

    /// Reduce one raw offer to an [`OfferRecord`]
    pub fn parse_offer(code: &str, offer: &Value) -> OfferRecord {
        let title = string_field(offer, "intitule").unwrap_or_default();

        let description = string_field(offer, "description")
            .or_else(|| string_field(offer, "descriptionOffre"));

        let salary_label = offer
            .get("salaire")
            .and_then(|s| s.get("libelle"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let raw_date = present(offer, "dateCreation").or_else(|| present(offer, "dateActualisation"));
        let created_at = raw_date.and_then(|v| v.as_str()).and_then(parse_date);

        OfferRecord {
            code: code.to_string(),
            title,
            description,
            salary_label,
            created_at,
        }
    }
}

/// Parse an API date
///
/// Accepts RFC 3339 (`2025-12-01T10:23:45.000Z`), naive date-times (taken as
/// UTC) and plain `YYYY-MM-DD` dates. Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    debug!(value, "Unparseable offer date");
    None
}

/// Field value unless absent or JSON null
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    present(value, key).and_then(Value::as_str).map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
