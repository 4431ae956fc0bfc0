//! France Travail client configuration
//!
//! Endpoint paths are constants of the partner API; credentials, scope and
//! base URLs come from the environment through the CLI.

use std::time::Duration;

use super::{FetcherError, FetcherResult};
use crate::pipeline::config::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_REQUEST_TIMEOUT_SECS};

/// Default OAuth2 token endpoint for partner applications
pub const DEFAULT_TOKEN_URL: &str =
    "https://entreprise.francetravail.fr/connexion/oauth2/access_token?realm=%2Fpartenaire";

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.francetravail.io";

/// Default OAuth2 scope
pub const DEFAULT_SCOPE: &str = "api_offresdemploiv2 o2dsoffre";

/// Classification-code catalog path
pub const CATALOG_ENDPOINT: &str = "/partenaire/offresdemploi/v2/referentiel/domaines";

/// Offer search path
pub const OFFERS_SEARCH_ENDPOINT: &str = "/partenaire/offresdemploi/v2/offres/search";

/// Configuration for [`crate::fetcher::client::FranceTravailClient`]
#[derive(Debug, Clone)]
pub struct FranceTravailConfig {
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// OAuth2 scope
    pub scope: String,
    /// Token endpoint URL
    pub token_url: String,
    /// API base URL, without trailing slash
    pub api_base_url: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Overall request timeout
    pub request_timeout: Duration,
}

impl FranceTravailConfig {
    /// Configuration with default URLs, scope and timeouts
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: DEFAULT_SCOPE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the token endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Override the API base URL (trailing slashes are trimmed)
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the OAuth2 scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Override the overall request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reject configurations that cannot authenticate
    pub fn validate(&self) -> FetcherResult<()> {
        let missing: Vec<&str> = [
            ("client id", self.client_id.as_str()),
            ("client secret", self.client_secret.as_str()),
            ("token URL", self.token_url.as_str()),
            ("API base URL", self.api_base_url.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(FetcherError::ConfigError(format!(
                "France Travail configuration incomplete: missing {}",
                missing.join(", ")
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(FetcherError::ConfigError(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
