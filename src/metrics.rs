//! Pipeline metrics
//!
//! Counters and histograms are emitted through the `metrics` facade. They
//! are no-ops until [`init_metrics`] installs the Prometheus exporter, so
//! library users and tests pay nothing for them.
//!
//! ## Exported series
//!
//! - `api_requests_total{endpoint,status}` - data API calls by outcome
//! - `token_refresh_total` - OAuth2 token requests
//! - `throttle_wait_seconds` - time spent in the rate limiter
//! - `codes_processed_total{outcome}` - per-code results of a statistics run

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Metrics setup errors
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Prometheus exporter could not be installed
    #[error("failed to install Prometheus exporter on {addr}: {reason}")]
    InstallFailed {
        /// Requested listen address
        addr: SocketAddr,
        /// Underlying error
        reason: String,
    },
}

/// Install the Prometheus exporter and describe all series
///
/// Must be called from within a Tokio runtime. Calling it again after a
/// successful install is a no-op.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    if METRICS_INITIALIZED.load(Ordering::Acquire) {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::InstallFailed {
            addr,
            reason: e.to_string(),
        })?;

    describe_counter!(
        "api_requests_total",
        Unit::Count,
        "Total number of France Travail data API requests"
    );
    describe_counter!(
        "token_refresh_total",
        Unit::Count,
        "Total number of OAuth2 access token requests"
    );
    describe_histogram!(
        "throttle_wait_seconds",
        Unit::Seconds,
        "Time spent waiting in the rate limiter before a call"
    );
    describe_counter!(
        "codes_processed_total",
        Unit::Count,
        "Classification codes processed by statistics runs"
    );

    METRICS_INITIALIZED.store(true, Ordering::Release);
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Whether the exporter has been installed
pub fn is_initialized() -> bool {
    METRICS_INITIALIZED.load(Ordering::Acquire)
}

/// Label value for an API response status (`network_error` when none)
pub fn status_label(status: Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "network_error".to_string(),
    }
}

/// Record one data API call
pub fn record_api_request(endpoint: &str, status: Option<u16>) {
    counter!(
        "api_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status_label(status),
    )
    .increment(1);
}

/// Record one token request
pub fn record_token_refresh() {
    counter!("token_refresh_total").increment(1);
}

/// Record time spent in the rate limiter
pub fn record_throttle_wait(waited: Duration) {
    histogram!("throttle_wait_seconds").record(waited.as_secs_f64());

    if waited.as_millis() > 100 {
        debug!(wait_ms = waited.as_millis(), "Throttled before API call");
    }
}

/// Record the outcome of one classification code in a run
pub fn record_code_outcome(outcome: &str) {
    counter!("codes_processed_total", "outcome" => outcome.to_string()).increment(1);
}
