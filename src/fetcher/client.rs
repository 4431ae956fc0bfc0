//! Live France Travail implementation of [`OfferSource`]

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::{FranceTravailConfig, CATALOG_ENDPOINT, OFFERS_SEARCH_ENDPOINT};
use super::http::{build_http_client, ApiHttpClient};
use super::pagination::{first_page_range, resolve_total};
use super::parser::FranceTravailParser;
use super::{FetcherError, FetcherResult, OfferPage, OfferSource};
use crate::pipeline::RateLimiter;
use crate::ClassificationCode;

/// France Travail "offres d'emploi v2" client
pub struct FranceTravailClient {
    http: ApiHttpClient,
}

impl FranceTravailClient {
    /// Create a client from a validated configuration
    ///
    /// # Errors
    /// Returns `FetcherError::ConfigError` if credentials or URLs are missing
    pub fn new(config: FranceTravailConfig, rate_limiter: Arc<RateLimiter>) -> FetcherResult<Self> {
        config.validate()?;
        let client = build_http_client(&config)?;
        Ok(Self {
            http: ApiHttpClient::new(client, &config, rate_limiter),
        })
    }

    /// Underlying HTTP client (token manager, limiter)
    pub fn http(&self) -> &ApiHttpClient {
        &self.http
    }
}

#[async_trait]
impl OfferSource for FranceTravailClient {
    async fn fetch_classification_codes(&self) -> FetcherResult<Vec<ClassificationCode>> {
        let response = self
            .http
            .get(CATALOG_ENDPOINT, &[], "classification catalog fetch")
            .await?;

        let codes = FranceTravailParser::parse_catalog(&response.body)?;
        info!(count = codes.len(), "Fetched classification codes");
        Ok(codes)
    }

    async fn fetch_offers(&self, code: &str, limit: u32, region: &str) -> FetcherResult<OfferPage> {
        let params = [
            ("region", region.to_string()),
            ("domaine", code.to_string()),
            ("range", first_page_range(limit)),
        ];
        let operation = format!("offer search for code {code} in region {region}");

        let response = self
            .http
            .get(OFFERS_SEARCH_ENDPOINT, &params, &operation)
            .await
            .map_err(|e| {
                if let FetcherError::UpstreamError { status, .. } = &e {
                    warn!(code, region, status, "Offer search failed");
                }
                e
            })?;

        let offers = FranceTravailParser::parse_offers(code, &response.body);
        let resolved = resolve_total(response.content_range(), offers.len());

        debug!(
            code,
            region,
            sample = offers.len(),
            total = resolved.total,
            estimated = resolved.is_estimate,
            "Fetched offers"
        );

        Ok(OfferPage {
            offers,
            total: resolved.total,
            total_is_estimate: resolved.is_estimate,
        })
    }
}
