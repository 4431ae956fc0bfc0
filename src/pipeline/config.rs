//! Pipeline configuration constants

use std::time::Duration;

/// Minimum spacing between two outbound API calls.
/// 500 ms keeps a full pass well under the partner API quota without
/// noticeably slowing a run over the ~100 catalog codes.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 500;

/// Hard ceiling on the offer-search page size imposed by the API.
pub const MAX_PAGE_SIZE: u32 = 150;

/// Default number of offers sampled per classification code.
pub const DEFAULT_SAMPLE_LIMIT: u32 = MAX_PAGE_SIZE;

/// Region searched when none is given (28 = Normandie).
pub const DEFAULT_REGION: &str = "28";

/// Token lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_EXPIRES_IN_SECS: i64 = 1800;

/// Safety margin subtracted from the token lifetime so it is refreshed
/// before the API starts rejecting it.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Upper bound on a cached token's lifetime, whatever the server announces.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// HTTP connect timeout (seconds) - time to establish TCP connection
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP request timeout (seconds) - overall time for the entire request
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default minimum interval as a [`Duration`]
pub fn default_min_interval() -> Duration {
    Duration::from_millis(DEFAULT_MIN_INTERVAL_MS)
}

/// Clamp a requested sample size to a valid page size (1..=150)
pub fn clamp_page_size(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_SIZE)
}
