//! Classification catalog sync

use tracing::info;

use crate::fetcher::{FetcherError, OfferSource};
use crate::store::{StatsStore, StoreError};

/// Errors that abort a catalog sync
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Catalog could not be fetched
    #[error("catalog sync failed: {0}")]
    Fetcher(#[from] FetcherError),

    /// Persistence failure
    #[error("catalog sync failed: store error: {0}")]
    Store(#[from] StoreError),
}

/// Counts of a catalog sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Codes inserted
    pub created: usize,
    /// Existing codes whose label was refreshed
    pub updated: usize,
}

impl SyncSummary {
    /// Entries processed
    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// Fetch the catalog and upsert every entry by code
///
/// Duplicate entries in the catalog are upserted in order, so the last
/// label wins. Any fetch failure is fatal.
pub async fn sync_classification_codes(
    source: &dyn OfferSource,
    store: &mut dyn StatsStore,
) -> Result<SyncSummary, SyncError> {
    let codes = source.fetch_classification_codes().await?;

    let mut summary = SyncSummary::default();
    for entry in &codes {
        let (_, created) = store.upsert_classification_code(&entry.code, &entry.label)?;
        if created {
            summary.created += 1;
        } else {
            summary.updated += 1;
        }
    }

    info!(
        created = summary.created,
        updated = summary.updated,
        "Classification catalog synced"
    );
    Ok(summary)
}
