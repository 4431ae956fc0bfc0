//! Persistence of classification codes, runs and snapshots
//!
//! The pipeline only talks to the [`StatsStore`] trait. Two backends ship
//! with the crate:
//!
//! - [`MemoryStore`] - in-process, for tests and dry runs
//! - [`JsonFileStore`] - one JSON document on disk, written atomically

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ClassificationCode, OfferStats, StatRun, StatSnapshot};

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Referenced run does not exist
    #[error("run {0} not found")]
    RunNotFound(u64),

    /// Referenced classification code does not exist
    #[error("classification code {0} not found")]
    CodeNotFound(String),

    /// Run was already marked finished
    #[error("run {0} is already finished")]
    RunAlreadyFinished(u64),

    /// Record failed validation
    #[error("invalid record: {0}")]
    Invalid(String),

    /// Schema version mismatch
    #[error("schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Expected schema version
        expected: String,
        /// Found schema version
        found: String,
    },

    /// Store file too large
    #[error("store file too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge {
        /// Actual file size
        size: u64,
        /// Maximum allowed size
        max: u64,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    DeserializationError(String),

    /// Lock error
    #[error("lock error: {0}")]
    LockError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract used by the catalog sync and the statistics pass
pub trait StatsStore {
    /// Insert a code or update its label
    ///
    /// # Returns
    /// The stored record and `true` when it was newly created
    fn upsert_classification_code(
        &mut self,
        code: &str,
        label: &str,
    ) -> StoreResult<(ClassificationCode, bool)>;

    /// All known codes, in insertion order
    fn list_classification_codes(&self) -> StoreResult<Vec<ClassificationCode>>;

    /// Open a new run
    fn create_run(&mut self, started_at: DateTime<Utc>, comment: &str) -> StoreResult<StatRun>;

    /// Mark a run finished
    ///
    /// # Errors
    /// Fails if the run is unknown, already finished, or `finished_at`
    /// precedes its start
    fn finish_run(&mut self, run_id: u64, finished_at: DateTime<Utc>) -> StoreResult<StatRun>;

    /// Record one snapshot for a code within a run
    fn create_snapshot(
        &mut self,
        code: &str,
        run_id: u64,
        executed_at: DateTime<Utc>,
        stats: &OfferStats,
    ) -> StoreResult<StatSnapshot>;

    /// All runs, oldest first
    fn list_runs(&self) -> StoreResult<Vec<StatRun>>;

    /// Snapshots, optionally restricted to one run
    fn list_snapshots(&self, run_id: Option<u64>) -> StoreResult<Vec<StatSnapshot>>;
}

/// Records shared by every backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreData {
    codes: Vec<ClassificationCode>,
    runs: Vec<StatRun>,
    snapshots: Vec<StatSnapshot>,
    next_run_id: u64,
    next_snapshot_id: u64,
}

impl StoreData {
    fn next_id(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }

    fn upsert_code(&mut self, code: &str, label: &str) -> (ClassificationCode, bool) {
        if let Some(existing) = self.codes.iter_mut().find(|c| c.code == code) {
            existing.label = label.to_string();
            return (existing.clone(), false);
        }

        let record = ClassificationCode::new(code, label);
        self.codes.push(record.clone());
        debug!(code, "Created classification code");
        (record, true)
    }

    fn codes(&self) -> Vec<ClassificationCode> {
        self.codes.clone()
    }

    fn create_run(&mut self, started_at: DateTime<Utc>, comment: &str) -> StatRun {
        let run = StatRun {
            id: Self::next_id(&mut self.next_run_id),
            started_at,
            finished_at: None,
            comment: comment.to_string(),
        };
        self.runs.push(run.clone());
        run
    }

    fn finish_run(&mut self, run_id: u64, finished_at: DateTime<Utc>) -> StoreResult<StatRun> {
        let run = self
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or(StoreError::RunNotFound(run_id))?;

        if run.is_finished() {
            return Err(StoreError::RunAlreadyFinished(run_id));
        }

        let mut finished = run.clone();
        finished.finished_at = Some(finished_at);
        finished.validate().map_err(StoreError::Invalid)?;

        *run = finished.clone();
        Ok(finished)
    }

    fn create_snapshot(
        &mut self,
        code: &str,
        run_id: u64,
        executed_at: DateTime<Utc>,
        stats: &OfferStats,
    ) -> StoreResult<StatSnapshot> {
        if !self.codes.iter().any(|c| c.code == code) {
            return Err(StoreError::CodeNotFound(code.to_string()));
        }
        if !self.runs.iter().any(|r| r.id == run_id) {
            return Err(StoreError::RunNotFound(run_id));
        }

        let snapshot = StatSnapshot::from_stats(
            self.next_snapshot_id + 1,
            code,
            run_id,
            executed_at,
            stats,
        );
        snapshot.validate().map_err(StoreError::Invalid)?;

        self.next_snapshot_id += 1;
        self.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    fn runs(&self) -> Vec<StatRun> {
        self.runs.clone()
    }

    fn snapshots(&self, run_id: Option<u64>) -> Vec<StatSnapshot> {
        self.snapshots
            .iter()
            .filter(|s| run_id.map_or(true, |id| s.run_id == id))
            .cloned()
            .collect()
    }
}
