//! CLI error types and conversions

use crate::fetcher::FetcherError;
use crate::metrics::MetricsError;
use crate::pipeline::{RunError, SyncError};
use crate::store::StoreError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Fetcher error
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Store error
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    /// Catalog sync error
    #[error("{0}")]
    SyncError(#[from] SyncError),

    /// Statistics run error
    #[error("{0}")]
    RunError(#[from] RunError),

    /// Metrics setup error
    #[error("metrics error: {0}")]
    MetricsError(#[from] MetricsError),

    /// Result could not be rendered
    #[error("output error: {0}")]
    OutputError(String),
}
