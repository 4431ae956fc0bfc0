//! JSON file store
//!
//! The whole store is one versioned JSON document. Every mutation holds an
//! exclusive `fd-lock` on a sibling `.lock` file while it reloads the
//! document, applies the change and writes it back (temp file in the same
//! directory, synced, then atomically renamed over the target). Concurrent
//! processes sharing a file therefore never drop each other's records, and
//! the in-memory copy only moves forward once the write has succeeded.

use chrono::{DateTime, Utc};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{StatsStore, StoreData, StoreError, StoreResult};
use crate::{ClassificationCode, OfferStats, StatRun, StatSnapshot};

/// Current store schema version
const SCHEMA_VERSION: &str = "1.0.0";

/// Maximum allowed store file size (64 MB) to prevent memory exhaustion
///
/// Enforced on write as well as on read: a mutation that would push the
/// document past the limit fails and leaves the file untouched.
pub const MAX_STORE_FILE_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    schema_version: String,
    #[serde(flatten)]
    data: StoreData,
}

/// Store persisted as a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Open a store, creating an empty one if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let data = if path.exists() {
            debug!(path = %path.display(), "Loading store");
            let lock = RwLock::new(lock_file(&path)?);
            let _guard = lock
                .read()
                .map_err(|e| StoreError::LockError(format!("Failed to acquire read lock: {e}")))?;
            read_document(&path)?
        } else {
            info!(path = %path.display(), "Store file not found, starting empty");
            StoreData::default()
        };

        Ok(Self { path, data })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload, apply `change` and persist, all under the write lock
    fn mutate<T>(&mut self, change: impl FnOnce(&mut StoreData) -> StoreResult<T>) -> StoreResult<T> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError(e.to_string()))?;
        }

        let mut lock = RwLock::new(lock_file(&self.path)?);
        let _guard = lock
            .write()
            .map_err(|e| StoreError::LockError(format!("Failed to acquire write lock: {e}")))?;

        let mut data = if self.path.exists() {
            read_document(&self.path)?
        } else {
            self.data.clone()
        };

        let result = change(&mut data)?;
        write_document(&self.path, &data)?;
        self.data = data;
        Ok(result)
    }
}

fn lock_file(path: &Path) -> StoreResult<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path.with_extension("lock"))
        .map_err(|e| StoreError::LockError(format!("Failed to create lock file: {e}")))
}

/// Read and check the document; the caller holds the lock
fn read_document(path: &Path) -> StoreResult<StoreData> {
    let metadata = std::fs::metadata(path).map_err(|e| StoreError::IoError(e.to_string()))?;
    if metadata.len() > MAX_STORE_FILE_SIZE {
        return Err(StoreError::FileTooLarge {
            size: metadata.len(),
            max: MAX_STORE_FILE_SIZE,
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| StoreError::IoError(e.to_string()))?;

    let document: StoreDocument = serde_json::from_str(&contents).map_err(|e| {
        warn!(error = %e, "Failed to deserialize store");
        StoreError::DeserializationError(e.to_string())
    })?;

    if document.schema_version != SCHEMA_VERSION {
        return Err(StoreError::SchemaVersionMismatch {
            expected: SCHEMA_VERSION.to_string(),
            found: document.schema_version,
        });
    }

    Ok(document.data)
}

/// Atomically replace the document; the caller holds the write lock
fn write_document(path: &Path, data: &StoreData) -> StoreResult<()> {
    let document = StoreDocument {
        schema_version: SCHEMA_VERSION.to_string(),
        data: data.clone(),
    };
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| StoreError::SerializationError(e.to_string()))?;

    let size = json.len() as u64;
    if size > MAX_STORE_FILE_SIZE {
        warn!(size, max = MAX_STORE_FILE_SIZE, "Store document too large, not written");
        return Err(StoreError::FileTooLarge {
            size,
            max: MAX_STORE_FILE_SIZE,
        });
    }

    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(parent_dir)
        .map_err(|e| StoreError::IoError(format!("Failed to create temp file: {e}")))?;

    temp_file
        .write_all(json.as_bytes())
        .map_err(|e| StoreError::IoError(format!("Failed to write to temp file: {e}")))?;
    temp_file
        .flush()
        .map_err(|e| StoreError::IoError(format!("Failed to flush temp file: {e}")))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| StoreError::IoError(format!("Failed to sync temp file: {e}")))?;

    temp_file
        .persist(path)
        .map_err(|e| StoreError::IoError(format!("Failed to persist temp file: {e}")))?;

    debug!(path = %path.display(), "Store saved");
    Ok(())
}

impl StatsStore for JsonFileStore {
    fn upsert_classification_code(
        &mut self,
        code: &str,
        label: &str,
    ) -> StoreResult<(ClassificationCode, bool)> {
        self.mutate(|data| Ok(data.upsert_code(code, label)))
    }

    fn list_classification_codes(&self) -> StoreResult<Vec<ClassificationCode>> {
        Ok(self.data.codes())
    }

    fn create_run(&mut self, started_at: DateTime<Utc>, comment: &str) -> StoreResult<StatRun> {
        self.mutate(|data| Ok(data.create_run(started_at, comment)))
    }

    fn finish_run(&mut self, run_id: u64, finished_at: DateTime<Utc>) -> StoreResult<StatRun> {
        self.mutate(|data| data.finish_run(run_id, finished_at))
    }

    fn create_snapshot(
        &mut self,
        code: &str,
        run_id: u64,
        executed_at: DateTime<Utc>,
        stats: &OfferStats,
    ) -> StoreResult<StatSnapshot> {
        self.mutate(|data| data.create_snapshot(code, run_id, executed_at, stats))
    }

    fn list_runs(&self) -> StoreResult<Vec<StatRun>> {
        Ok(self.data.runs())
    }

    fn list_snapshots(&self, run_id: Option<u64>) -> StoreResult<Vec<StatSnapshot>> {
        Ok(self.data.snapshots(run_id))
    }
}
