//! Pipeline orchestration
//!
//! - [`rate_limit`] - Minimum spacing between outbound calls
//! - [`sync`] - Classification catalog sync
//! - [`executor`] - Statistics run over all known codes
//! - [`report`] - Per-code outcomes of a run

pub mod config;
pub mod executor;
pub mod rate_limit;
pub mod report;
pub mod sync;

pub use executor::{RunError, RunExecutor};
pub use rate_limit::RateLimiter;
pub use report::{CodeOutcome, RunReport};
pub use sync::{sync_classification_codes, SyncError, SyncSummary};
