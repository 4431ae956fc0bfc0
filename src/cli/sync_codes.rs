//! `sync-codes` command

use serde_json::json;
use tracing::info;

use super::{Cli, CliError, OutputFormat};
use crate::pipeline::sync_classification_codes;

/// Fetch the catalog and upsert it into the store
pub async fn execute(cli: &Cli) -> Result<(), CliError> {
    let client = cli.client()?;
    let mut store = cli.open_store()?;

    info!(store = %cli.store.display(), "Syncing classification codes");
    let summary = sync_classification_codes(&client, &mut store).await?;

    match cli.output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({"created": summary.created, "updated": summary.updated})
        ),
        OutputFormat::Human => println!(
            "Classification codes synced: {} created, {} updated",
            summary.created, summary.updated
        ),
    }

    Ok(())
}
