use clap::Parser;
use rome_stats::cli::{runs, sync_codes, Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber
///
/// - `RUST_LOG` controls the filter (default `rome_stats=info`)
/// - `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rome_stats=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Some(addr) = cli.metrics_addr {
        rome_stats::metrics::init_metrics(addr)?;
    }

    match &cli.command {
        Commands::SyncCodes => sync_codes::execute(cli).await?,
        Commands::FetchStats(args) => args.execute(cli).await?,
        Commands::Runs => runs::execute(cli)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
