//! OAuth2 client-credentials token cache
//!
//! The bearer token is fetched lazily, cached with its absolute expiry and
//! reused until then. Refreshes go through the shared rate limiter like any
//! other API call; cache hits cost nothing.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::config::FranceTravailConfig;
use super::{FetcherError, FetcherResult};
use crate::pipeline::config::{
    DEFAULT_TOKEN_EXPIRES_IN_SECS, MAX_TOKEN_LIFETIME_SECS, TOKEN_EXPIRY_MARGIN_SECS,
};
use crate::pipeline::RateLimiter;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Token fields extracted from a token endpoint response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Bearer token
    pub access_token: String,
    /// Lifetime in seconds, as announced by the server
    pub expires_in: i64,
}

impl TokenGrant {
    /// Absolute instant after which the token must be refreshed
    ///
    /// The usable lifetime is clamped to `0..=MAX_TOKEN_LIFETIME_SECS`, so a
    /// negative or absurdly large `expires_in` never overflows.
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let lifetime = self
            .expires_in
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
            .clamp(0, MAX_TOKEN_LIFETIME_SECS);
        Duration::try_seconds(lifetime)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(now)
    }
}

/// Parse a token endpoint JSON body
///
/// `access_token` is required; `expires_in` defaults to 1800 seconds and is
/// accepted as a number or a numeric string.
pub fn parse_token_response(body: &Value) -> FetcherResult<TokenGrant> {
    let access_token = body
        .get("access_token")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FetcherError::AuthError("access_token missing from token response".to_string()))?
        .to_string();

    let expires_in = match body.get("expires_in") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .unwrap_or(DEFAULT_TOKEN_EXPIRES_IN_SECS);

    Ok(TokenGrant {
        access_token,
        expires_in,
    })
}

/// Caches and refreshes the bearer token
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    rate_limiter: Arc<RateLimiter>,
    cached: Mutex<Option<CachedToken>>,
    refreshes: AtomicU64,
}

impl TokenManager {
    /// Create a token manager
    ///
    /// # Arguments
    /// * `client` - HTTP client (cheap to clone)
    /// * `config` - Credentials, scope and token URL
    /// * `rate_limiter` - Shared limiter also used by API requests
    pub fn new(client: Client, config: &FranceTravailConfig, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
            rate_limiter,
            cached: Mutex::new(None),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Number of token requests sent so far
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Drop the cached token so the next call fetches a new one
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    /// Return a valid bearer token, refreshing it when missing or expired
    ///
    /// # Errors
    /// Returns `FetcherError::AuthError` when the token endpoint fails or
    /// answers without `access_token`. Not retried.
    pub async fn get_token(&self) -> FetcherResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.access_token.clone());
            }
            debug!(expired_at = %token.expires_at, "Bearer token expired, refreshing");
        }

        let grant = self.request_token().await?;
        let expires_at = grant.expires_at(Utc::now());

        info!(expires_at = %expires_at, "Obtained France Travail bearer token");

        *cached = Some(CachedToken {
            access_token: grant.access_token.clone(),
            expires_at,
        });

        Ok(grant.access_token)
    }

    async fn request_token(&self) -> FetcherResult<TokenGrant> {
        self.rate_limiter.throttle().await;
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        crate::metrics::record_token_refresh();

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "France Travail token request failed");
                FetcherError::AuthError(format!("token request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "France Travail OAuth error");
            return Err(FetcherError::AuthError(format!(
                "token endpoint returned HTTP {status}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            FetcherError::AuthError(format!("token response is not valid JSON: {e}"))
        })?;

        parse_token_response(&body)
    }
}
