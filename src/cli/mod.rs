//! CLI command implementations

pub mod error;
pub mod fetch_stats;
pub mod runs;
pub mod sync_codes;

pub use error::CliError;
pub use fetch_stats::FetchStatsArgs;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::fetcher::client::FranceTravailClient;
use crate::fetcher::config::{
    FranceTravailConfig, DEFAULT_API_BASE_URL, DEFAULT_SCOPE, DEFAULT_TOKEN_URL,
};
use crate::pipeline::config::{DEFAULT_MIN_INTERVAL_MS, HTTP_REQUEST_TIMEOUT_SECS};
use crate::pipeline::RateLimiter;
use crate::store::JsonFileStore;

/// ROME statistics CLI
#[derive(Parser, Debug)]
#[command(name = "rome-stats")]
#[command(about = "Collect job-offer statistics per ROME code from France Travail", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json or human)
    #[arg(long, global = true, default_value = "human")]
    pub output_format: OutputFormat,

    /// Path of the JSON statistics store
    #[arg(long, global = true, env = "ROME_STATS_STORE", default_value = "rome_stats.json")]
    pub store: PathBuf,

    /// France Travail OAuth2 client id
    #[arg(long, global = true, env = "FRANCE_TRAVAIL_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// France Travail OAuth2 client secret
    #[arg(long, global = true, env = "FRANCE_TRAVAIL_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth2 scope
    #[arg(long, global = true, env = "FRANCE_TRAVAIL_SCOPE", default_value = DEFAULT_SCOPE)]
    pub scope: String,

    /// OAuth2 token endpoint
    #[arg(long, global = true, env = "FRANCE_TRAVAIL_TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,

    /// Base URL of the data API
    #[arg(long, global = true, env = "FRANCE_TRAVAIL_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Minimum spacing between two API calls, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_INTERVAL_MS)]
    pub min_interval_ms: u64,

    /// HTTP request timeout in seconds (range: 1-300)
    #[arg(long, global = true, default_value_t = HTTP_REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub request_timeout_secs: u64,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync the classification code catalog
    SyncCodes,

    /// Run a statistics pass over all known codes
    FetchStats(FetchStatsArgs),

    /// List recorded runs
    Runs,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl Cli {
    /// Build the API configuration from flags and environment
    pub fn france_travail_config(&self) -> Result<FranceTravailConfig, CliError> {
        let config = FranceTravailConfig::new(
            self.client_id.clone().unwrap_or_default(),
            self.client_secret.clone().unwrap_or_default(),
        )
        .with_scope(&self.scope)
        .with_token_url(&self.token_url)
        .with_api_base_url(&self.api_base_url)
        .with_request_timeout(Duration::from_secs(self.request_timeout_secs));

        config.validate()?;
        Ok(config)
    }

    /// Shared rate limiter for one command
    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(Duration::from_millis(self.min_interval_ms)))
    }

    /// Live API client
    pub fn client(&self) -> Result<FranceTravailClient, CliError> {
        let config = self.france_travail_config()?;
        Ok(FranceTravailClient::new(config, self.rate_limiter())?)
    }

    /// Open the configured store
    pub fn open_store(&self) -> Result<JsonFileStore, CliError> {
        Ok(JsonFileStore::open(&self.store)?)
    }
}
