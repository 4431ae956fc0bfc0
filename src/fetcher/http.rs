//! Authenticated HTTP client for the France Travail API
//!
//! Every GET:
//! - obtains a bearer token from the [`TokenManager`] (may cost one rate-limit tick)
//! - takes exactly one rate-limit tick right before the request
//! - maps non-success statuses to `FetcherError::UpstreamError`
//!
//! No request is retried; the rate limiter is the only pacing mechanism.

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_RANGE};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use super::config::FranceTravailConfig;
use super::token::TokenManager;
use super::{FetcherError, FetcherResult};
use crate::pipeline::RateLimiter;

/// Build the underlying HTTP client with explicit, finite timeouts
pub fn build_http_client(config: &FranceTravailConfig) -> FetcherResult<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| FetcherError::ConfigError(format!("failed to build HTTP client: {e}")))
}

/// A successful API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (2xx)
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// JSON body; `Value::Null` when the body is empty
    pub body: Value,
}

impl ApiResponse {
    /// Raw `Content-Range` header, if present and valid UTF-8
    pub fn content_range(&self) -> Option<&str> {
        self.headers.get(CONTENT_RANGE)?.to_str().ok()
    }
}

/// Bearer-authenticated, rate-limited GET client
pub struct ApiHttpClient {
    client: Client,
    base_url: String,
    tokens: TokenManager,
    rate_limiter: Arc<RateLimiter>,
}

impl ApiHttpClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `client` - HTTP client built by [`build_http_client`]
    /// * `config` - API base URL and credentials
    /// * `rate_limiter` - Limiter shared with the token manager
    pub fn new(client: Client, config: &FranceTravailConfig, rate_limiter: Arc<RateLimiter>) -> Self {
        let tokens = TokenManager::new(client.clone(), config, rate_limiter.clone());
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            rate_limiter,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token manager used for authentication
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Rate limiter shared by all calls
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Execute an authenticated GET request
    ///
    /// # Arguments
    /// * `endpoint` - API path (e.g., "/partenaire/offresdemploi/v2/offres/search")
    /// * `params` - Query parameters
    /// * `operation` - Human-readable description used in errors and logs
    ///
    /// # Errors
    /// - `AuthError` when no token can be obtained
    /// - `NetworkError` on transport failure or timeout
    /// - `UpstreamError` on non-2xx status
    /// - `InvalidResponse` when a non-empty body is not JSON
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        operation: &str,
    ) -> FetcherResult<ApiResponse> {
        let token = self.tokens.get_token().await?;

        self.rate_limiter.throttle().await;

        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        debug!(url = %url, params = ?params, "GET {}", operation);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| {
                crate::metrics::record_api_request(endpoint, None);
                FetcherError::NetworkError(format!("{operation}: {e}"))
            })?;

        let status = response.status();
        crate::metrics::record_api_request(endpoint, Some(status.as_u16()));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = %body,
                operation,
                "France Travail request failed"
            );
            return Err(FetcherError::UpstreamError {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| FetcherError::NetworkError(format!("{operation}: {e}")))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| FetcherError::InvalidResponse(format!("{operation}: {e}")))?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
