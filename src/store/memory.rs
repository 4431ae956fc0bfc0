//! In-memory store

use chrono::{DateTime, Utc};

use super::{StatsStore, StoreData, StoreResult};
use crate::{ClassificationCode, OfferStats, StatRun, StatSnapshot};

/// Store keeping every record in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with classification codes
    pub fn with_codes<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = ClassificationCode>,
    {
        let mut store = Self::new();
        for code in codes {
            store.data.upsert_code(&code.code, &code.label);
        }
        store
    }
}

impl StatsStore for MemoryStore {
    fn upsert_classification_code(
        &mut self,
        code: &str,
        label: &str,
    ) -> StoreResult<(ClassificationCode, bool)> {
        Ok(self.data.upsert_code(code, label))
    }

    fn list_classification_codes(&self) -> StoreResult<Vec<ClassificationCode>> {
        Ok(self.data.codes())
    }

    fn create_run(&mut self, started_at: DateTime<Utc>, comment: &str) -> StoreResult<StatRun> {
        Ok(self.data.create_run(started_at, comment))
    }

    fn finish_run(&mut self, run_id: u64, finished_at: DateTime<Utc>) -> StoreResult<StatRun> {
        self.data.finish_run(run_id, finished_at)
    }

    fn create_snapshot(
        &mut self,
        code: &str,
        run_id: u64,
        executed_at: DateTime<Utc>,
        stats: &OfferStats,
    ) -> StoreResult<StatSnapshot> {
        self.data.create_snapshot(code, run_id, executed_at, stats)
    }

    fn list_runs(&self) -> StoreResult<Vec<StatRun>> {
        Ok(self.data.runs())
    }

    fn list_snapshots(&self, run_id: Option<u64>) -> StoreResult<Vec<StatSnapshot>> {
        Ok(self.data.snapshots(run_id))
    }
}
