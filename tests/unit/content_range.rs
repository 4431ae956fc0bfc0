//! Unit tests for Content-Range handling

use rome_stats::fetcher::pagination::{first_page_range, parse_content_range, resolve_total};

#[test]
fn test_total_is_read_regardless_of_window() {
    assert_eq!(parse_content_range("offres 0-149/3512"), Some(3512));
    assert_eq!(parse_content_range("offres 150-299/3512"), Some(3512));
    assert_eq!(parse_content_range("offres 0-0/1"), Some(1));
}

#[test]
fn test_header_embedded_in_longer_value() {
    assert_eq!(parse_content_range("bytes offres 0-149/987"), Some(987));
    assert_eq!(parse_content_range("offres\t0-149/987;extra"), Some(987));
}

#[test]
fn test_large_totals() {
    assert_eq!(
        parse_content_range("offres 0-149/18446744073709551615"),
        Some(u64::MAX)
    );
    // overflow is treated as a malformed header
    assert_eq!(parse_content_range("offres 0-149/18446744073709551616"), None);
}

#[test]
fn test_fallback_flags_estimate() {
    let resolved = resolve_total(Some("offres 0-149"), 150);
    assert_eq!(resolved.total, 150);
    assert!(resolved.is_estimate);
}

#[test]
fn test_range_parameter_matches_limit() {
    for limit in 1..=150u32 {
        assert_eq!(first_page_range(limit), format!("0-{}", limit - 1));
    }
}
