//! Statistics run executor
//!
//! Drives one sequential pass over every known classification code:
//! open a [`StatRun`](crate::StatRun), fetch a sample of offers per code,
//! aggregate it, record a snapshot, then close the run.
//!
//! Recoverable fetch failures skip the code and the pass continues.
//! Authentication, configuration and store failures abort the pass and
//! leave the run unfinished.

use chrono::{SecondsFormat, Utc};
use indicatif::ProgressBar;
use tracing::{error, info, warn};

use super::config::{clamp_page_size, DEFAULT_REGION, DEFAULT_SAMPLE_LIMIT};
use super::report::{CodeOutcome, RunReport};
use crate::fetcher::{FetcherError, OfferSource};
use crate::stats;
use crate::store::{StatsStore, StoreError};

/// Errors that abort a statistics run
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Fatal fetcher failure
    #[error("statistics run aborted while processing {code}: {source}")]
    Fetcher {
        /// Code being processed when the failure happened
        code: String,
        /// Underlying error
        #[source]
        source: FetcherError,
    },

    /// Persistence failure
    #[error("statistics run aborted: store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog is empty
    #[error("no classification codes known; sync the catalog first")]
    NoClassificationCodes,
}

/// Executes statistics runs against an [`OfferSource`]
pub struct RunExecutor<'a> {
    source: &'a dyn OfferSource,
    limit: u32,
    region: String,
    progress: ProgressBar,
}

impl<'a> RunExecutor<'a> {
    /// Create an executor with the default sample limit and region
    pub fn new(source: &'a dyn OfferSource) -> Self {
        Self {
            source,
            limit: DEFAULT_SAMPLE_LIMIT,
            region: DEFAULT_REGION.to_string(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Offers sampled per code, clamped to a valid page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = clamp_page_size(limit);
        self
    }

    /// Region searched for every code
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Report per-code progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Sample limit in effect
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Region in effect
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Run one full pass
    ///
    /// # Errors
    /// See [`RunError`]. On error the run record is left unfinished.
    pub async fn execute(&self, store: &mut dyn StatsStore) -> Result<RunReport, RunError> {
        let started_at = Utc::now();
        let comment = format!(
            "Automatic run {}",
            started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let run = store.create_run(started_at, &comment)?;

        let codes = store.list_classification_codes()?;
        if codes.is_empty() {
            error!(run_id = run.id, "No classification codes to process");
            return Err(RunError::NoClassificationCodes);
        }

        info!(
            run_id = run.id,
            codes = codes.len(),
            limit = self.limit,
            region = %self.region,
            "Starting statistics run"
        );
        self.progress.set_length(codes.len() as u64);

        let mut outcomes = Vec::with_capacity(codes.len());
        for entry in &codes {
            let code = entry.code.as_str();
            self.progress.set_message(code.to_string());

            let outcome = match self.source.fetch_offers(code, self.limit, &self.region).await {
                Ok(page) => {
                    let executed_at = Utc::now();
                    let offer_stats = stats::aggregate(&page.offers, Some(page.total), executed_at);
                    let snapshot = store.create_snapshot(code, run.id, executed_at, &offer_stats)?;
                    info!(
                        code,
                        offers = snapshot.offer_count,
                        sample = page.offers.len(),
                        estimated_total = page.total_is_estimate,
                        "Recorded snapshot"
                    );
                    CodeOutcome::Success(snapshot)
                }
                Err(e) if e.is_recoverable() => {
                    warn!(code, region = %self.region, error = %e, "Skipping classification code");
                    CodeOutcome::Failure {
                        code: code.to_string(),
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    error!(run_id = run.id, code, error = %e, "Aborting statistics run");
                    self.progress.abandon();
                    return Err(RunError::Fetcher {
                        code: code.to_string(),
                        source: e,
                    });
                }
            };

            crate::metrics::record_code_outcome(outcome.label());
            outcomes.push(outcome);
            self.progress.inc(1);
        }

        let run = store.finish_run(run.id, Utc::now())?;
        self.progress.finish_and_clear();

        let report = RunReport { run, outcomes };
        info!(
            run_id = report.run.id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            duration_secs = report.run.duration().map(|d| d.as_secs()),
            "Statistics run finished"
        );
        Ok(report)
    }
}
