//! Offer-search paging helpers
//!
//! The search endpoint takes a `range=<start>-<end>` query parameter
//! (0-indexed, inclusive, at most 150 wide) and reports the full result count
//! in a `Content-Range: offres <start>-<end>/<total>` response header.
//!
//! When the header is absent or malformed, the sample size stands in for the
//! total. That understates codes with more than one page of offers; the
//! fallback is kept for compatibility with previously recorded snapshots and
//! flagged through [`ResolvedTotal::is_estimate`].

use tracing::debug;

use crate::pipeline::config::clamp_page_size;

/// Unit prefix of the offer-search `Content-Range` header
const RANGE_UNIT: &str = "offres";

/// Build the `range` parameter for the first page
///
/// `limit` is clamped to 1..=150.
pub fn first_page_range(limit: u32) -> String {
    let requested = clamp_page_size(limit);
    format!("0-{}", requested - 1)
}

/// Extract the total from a `Content-Range` header value
///
/// Accepts `offres <start>-<end>/<total>` anywhere in the value, with any
/// whitespace after the unit. Returns `None` for anything else.
pub fn parse_content_range(value: &str) -> Option<u64> {
    value
        .match_indices(RANGE_UNIT)
        .find_map(|(idx, _)| parse_after_unit(&value[idx + RANGE_UNIT.len()..]))
}

fn parse_after_unit(rest: &str) -> Option<u64> {
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return None;
    }

    let (start, rest) = split_digits(trimmed)?;
    let rest = rest.strip_prefix('-')?;
    let (end, rest) = split_digits(rest)?;
    let rest = rest.strip_prefix('/')?;
    let (total, _) = split_digits(rest)?;

    debug!(start, end, total, "Parsed Content-Range");
    total.parse().ok()
}

fn split_digits(s: &str) -> Option<(&str, &str)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    Some(s.split_at(len))
}

/// Total offer count for a page, with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTotal {
    /// Total offers
    pub total: u64,
    /// `true` when the sample size was substituted for a missing header
    pub is_estimate: bool,
}

/// Resolve the total from an optional header, falling back to the sample size
pub fn resolve_total(content_range: Option<&str>, sample_size: usize) -> ResolvedTotal {
    match content_range.and_then(parse_content_range) {
        Some(total) => ResolvedTotal {
            total,
            is_estimate: false,
        },
        None => {
            debug!(
                header = ?content_range,
                sample_size,
                "No usable Content-Range, using sample size as total"
            );
            ResolvedTotal {
                total: sample_size as u64,
                is_estimate: true,
            }
        }
    }
}
