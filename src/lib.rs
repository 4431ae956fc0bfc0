//! # ROME Stats Library
//!
//! Collects job-offer statistics from the France Travail "offres d'emploi v2"
//! API, grouped by ROME classification code, and records one snapshot per
//! code per run so indicators can be tracked over time.
//!
//! ## Features
//!
//! - **OAuth2 client credentials**: Bearer token cached and refreshed before expiry
//! - **Rate Limiting**: Minimum spacing between every outbound API call
//! - **Content-Range totals**: True offer counts even when only a sample is analysed
//! - **Salary normalization**: Free-text salary labels converted to monthly amounts
//! - **Per-run reporting**: Partial failures surface as typed per-code outcomes
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rome_stats::fetcher::client::FranceTravailClient;
//! use rome_stats::fetcher::config::FranceTravailConfig;
//! use rome_stats::pipeline::{RateLimiter, RunExecutor};
//! use rome_stats::store::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FranceTravailConfig::new("client-id", "client-secret");
//! let limiter = Arc::new(RateLimiter::default());
//! let client = FranceTravailClient::new(config, limiter)?;
//!
//! let mut store = MemoryStore::new();
//! let report = RunExecutor::new(&client).execute(&mut store).await?;
//! println!("{} codes ok, {} failed", report.succeeded(), report.failed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`fetcher`] - Token manager, HTTP client and response parsing
//! - [`stats`] - Salary normalizer and per-code aggregator
//! - [`pipeline`] - Rate limiter, run executor and run report
//! - [`store`] - Persistence contract with in-memory and JSON file backends
//! - [`metrics`] - Counters and histograms for API usage
//! - [`cli`] - Command-line commands

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CLI command implementations
pub mod cli;

/// API access: tokens, HTTP, parsing
pub mod fetcher;

/// Counters and histograms
pub mod metrics;

/// Run orchestration and rate limiting
pub mod pipeline;

/// Salary normalization and aggregation
pub mod stats;

/// Persistence of codes, runs and snapshots
pub mod store;

/// A ROME classification code from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationCode {
    /// Unique code (e.g., "D11")
    pub code: String,
    /// Human-readable label
    pub label: String,
}

impl ClassificationCode {
    /// Create a code/label pair
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// One job offer, reduced to the fields the statistics need
///
/// Never persisted; lives for the duration of one code's aggregation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OfferRecord {
    /// Classification code the offer was fetched for
    pub code: String,
    /// Offer title (`intitule`)
    pub title: String,
    /// Offer description (`description`, else `descriptionOffre`)
    pub description: Option<String>,
    /// Free-text salary label (`salaire.libelle`)
    pub salary_label: Option<String>,
    /// Creation date (`dateCreation`, else `dateActualisation`)
    pub created_at: Option<DateTime<Utc>>,
}

/// Indicators computed for one classification code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferStats {
    /// Average monthly salary over offers with a usable salary label
    pub avg_salary: Option<f64>,
    /// Percentage (0-100) of sampled offers mentioning "urgent"
    pub urgent_rate: f64,
    /// Average number of days since the offers were created
    pub avg_days_open: Option<f64>,
    /// Total offers reported upstream (not the sample size)
    pub offer_count: u64,
}

/// One execution of the statistics pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatRun {
    /// Generated identifier
    pub id: u64,
    /// When the pass started
    pub started_at: DateTime<Utc>,
    /// When the pass completed; absent for running or aborted passes
    pub finished_at: Option<DateTime<Utc>>,
    /// Free-text comment
    pub comment: String,
}

impl StatRun {
    /// Whether the run reached its end
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Wall-clock duration of a finished run
    pub fn duration(&self) -> Option<Duration> {
        let finished = self.finished_at?;
        (finished - self.started_at).to_std().ok()
    }

    /// Validate run timestamps
    pub fn validate(&self) -> Result<(), String> {
        if let Some(finished) = self.finished_at {
            if finished < self.started_at {
                return Err(format!(
                    "Run {} finished at {} before it started at {}",
                    self.id, finished, self.started_at
                ));
            }
        }
        Ok(())
    }
}

/// Indicators recorded for one classification code within one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatSnapshot {
    /// Generated identifier
    pub id: u64,
    /// Classification code this snapshot describes
    pub code: String,
    /// Run this snapshot belongs to
    pub run_id: u64,
    /// When the indicators were computed
    pub executed_at: DateTime<Utc>,
    /// Average monthly salary
    pub avg_salary: Option<Decimal>,
    /// Percentage of urgent offers (0-100)
    pub urgent_rate: Decimal,
    /// Average listing age in days
    pub avg_days_open: Option<Decimal>,
    /// Total offers reported upstream
    pub offer_count: u64,
}

impl StatSnapshot {
    /// Build a snapshot from computed indicators
    pub fn from_stats(
        id: u64,
        code: impl Into<String>,
        run_id: u64,
        executed_at: DateTime<Utc>,
        stats: &OfferStats,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            run_id,
            executed_at,
            avg_salary: stats.avg_salary.and_then(stats::to_decimal),
            urgent_rate: stats::to_decimal(stats.urgent_rate).unwrap_or(Decimal::ZERO),
            avg_days_open: stats.avg_days_open.and_then(stats::to_decimal),
            offer_count: stats.offer_count,
        }
    }

    /// Validate snapshot values
    pub fn validate(&self) -> Result<(), String> {
        if self.urgent_rate < Decimal::ZERO || self.urgent_rate > Decimal::ONE_HUNDRED {
            return Err(format!(
                "Urgent rate ({}) must be between 0 and 100",
                self.urgent_rate
            ));
        }

        if let Some(salary) = self.avg_salary {
            if salary < Decimal::ZERO {
                return Err(format!("Average salary ({salary}) must not be negative"));
            }
        }

        Ok(())
    }
}
