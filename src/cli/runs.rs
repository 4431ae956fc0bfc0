//! `runs` command

use serde_json::json;

use super::{Cli, CliError, OutputFormat};
use crate::store::StatsStore;

/// List recorded runs with their snapshot counts
pub fn execute(cli: &Cli) -> Result<(), CliError> {
    let store = cli.open_store()?;
    let runs = store.list_runs()?;

    match cli.output_format {
        OutputFormat::Json => {
            let mut rows = Vec::with_capacity(runs.len());
            for run in &runs {
                let snapshots = store.list_snapshots(Some(run.id))?.len();
                rows.push(json!({
                    "id": run.id,
                    "started_at": run.started_at,
                    "finished_at": run.finished_at,
                    "duration_secs": run.duration().map(|d| d.as_secs()),
                    "comment": run.comment,
                    "snapshots": snapshots,
                }));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&rows)
                    .map_err(|e| CliError::OutputError(e.to_string()))?
            );
        }
        OutputFormat::Human => {
            println!("Found {} runs:\n", runs.len());
            for run in &runs {
                let snapshots = store.list_snapshots(Some(run.id))?.len();
                let status = match run.duration() {
                    Some(d) => format!("finished in {}s", d.as_secs()),
                    None => "unfinished".to_string(),
                };
                println!(
                    "#{} | {} | {} | {} snapshots | {}",
                    run.id,
                    run.started_at.format("%Y-%m-%d %H:%M:%S"),
                    status,
                    snapshots,
                    run.comment
                );
            }
        }
    }

    Ok(())
}
