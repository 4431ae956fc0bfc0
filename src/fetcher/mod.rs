//! France Travail API access
//!
//! - [`config`] - Credentials, URLs and timeouts
//! - [`token`] - OAuth2 client-credentials token cache
//! - [`http`] - Authenticated, throttled GET requests
//! - [`pagination`] - `range` parameter and `Content-Range` totals
//! - [`parser`] - JSON to [`ClassificationCode`] / [`OfferRecord`]
//! - [`client`] - [`OfferSource`] implementation over the live API

use crate::{ClassificationCode, OfferRecord};
use async_trait::async_trait;

pub mod client;
pub mod config;
pub mod http;
pub mod pagination;
pub mod parser;
pub mod token;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Token acquisition or refresh failed
    #[error("authentication error: {0}")]
    AuthError(String),

    /// The API answered with a non-success status
    #[error("upstream error during {operation}: HTTP {status}: {body}")]
    UpstreamError {
        /// What was being fetched
        operation: String,
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Transport failure (DNS, connection, timeout)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response body could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Incomplete or invalid client configuration
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl FetcherError {
    /// Whether a statistics pass may skip the failing code and continue
    ///
    /// Authentication and configuration failures affect every code and must
    /// abort the pass.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            FetcherError::AuthError(_) | FetcherError::ConfigError(_)
        )
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// A sample of offers and the total reported upstream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OfferPage {
    /// Offers actually returned (at most one page)
    pub offers: Vec<OfferRecord>,
    /// Total offers available upstream
    pub total: u64,
    /// `true` when `total` fell back to the sample size because the
    /// `Content-Range` header was missing or malformed
    pub total_is_estimate: bool,
}

/// Source of classification codes and offers
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Fetch the classification-code catalog
    ///
    /// # Returns
    /// Codes in API order; entries without a code are dropped, duplicates kept
    async fn fetch_classification_codes(&self) -> FetcherResult<Vec<ClassificationCode>>;

    /// Fetch one page of offers for a classification code
    ///
    /// # Arguments
    /// * `code` - Classification code (sent as `domaine`)
    /// * `limit` - Requested sample size, capped at 150
    /// * `region` - Region code (e.g., "28")
    async fn fetch_offers(&self, code: &str, limit: u32, region: &str) -> FetcherResult<OfferPage>;
}
