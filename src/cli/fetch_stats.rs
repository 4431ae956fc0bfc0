//! `fetch-stats` command

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use super::{Cli, CliError, OutputFormat};
use crate::pipeline::config::{DEFAULT_REGION, DEFAULT_SAMPLE_LIMIT, MAX_PAGE_SIZE};
use crate::pipeline::{RunExecutor, RunReport};

/// Arguments of the statistics pass
#[derive(Args, Debug)]
pub struct FetchStatsArgs {
    /// Offers sampled per code (range: 1-150)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    pub limit: u32,

    /// Region code searched
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,
}

impl FetchStatsArgs {
    /// Run one statistics pass and print its summary
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let client = cli.client()?;
        let mut store = cli.open_store()?;

        let progress = match cli.output_format {
            OutputFormat::Human => create_progress_bar()?,
            OutputFormat::Json => ProgressBar::hidden(),
        };

        let report = RunExecutor::new(&client)
            .with_limit(self.limit)
            .with_region(&self.region)
            .with_progress(progress)
            .execute(&mut store)
            .await?;

        print_report(&report, cli.output_format)
    }
}

fn create_progress_bar() -> Result<ProgressBar, CliError> {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map_err(|e| CliError::OutputError(e.to_string()))?
        .progress_chars("#>-");

    let pb = ProgressBar::new(0);
    pb.set_style(style);
    Ok(pb)
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let failures: Vec<_> = report
                .failures()
                .map(|(code, reason)| json!({"code": code, "reason": reason}))
                .collect();
            let snapshots: Vec<_> = report.snapshots().collect();
            let output = json!({
                "run": report.run,
                "succeeded": report.succeeded(),
                "failed": report.failed(),
                "snapshots": snapshots,
                "failures": failures,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .map_err(|e| CliError::OutputError(e.to_string()))?
            );
        }
        OutputFormat::Human => {
            println!(
                "Run {} finished: {} codes recorded, {} skipped",
                report.run.id,
                report.succeeded(),
                report.failed()
            );
            for (code, reason) in report.failures() {
                println!("  skipped {code}: {reason}");
            }
        }
    }
    Ok(())
}
