//! Pingverdict - remote ping connectivity checks
//!
//! Pings destinations from remote hosts over SSH and checks each
//! (host, destination) pair against its expected verdict.

mod analysis;
mod config;
mod output;
mod testing;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "pingverdict")]
#[command(author = "Florian Schüller <schuellerf@gmail.com>")]
#[command(version)]
#[command(about = "Check ping connectivity from remote hosts against expected verdicts", long_about = None)]
struct Args {
    /// Test bundle path
    #[arg(short, long, default_value = "bundle.toml")]
    config: PathBuf,

    /// Also write the results as CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only probe this host (repeatable)
    #[arg(long = "host")]
    hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration first, the log level lives in it
    let config = config::Config::load(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Pingverdict v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Loaded {} test(s) from {:?}",
        config.test_data.len(),
        args.config
    );

    for (host, destination) in config.duplicate_pairs() {
        warn!(
            "Duplicate test_data entry for {} -> {}, the first max_drop applies",
            host, destination
        );
    }

    let config = Arc::new(config);
    let runner = Arc::new(testing::SshRunner::new(&config.runner));
    let tester = testing::TestRunner::new(config.clone(), runner);

    let batches = tester.run_all(&args.hosts).await?;
    let outcomes = analysis::evaluate(&config.test_data, &batches);

    let summary = output::print_report(&outcomes);

    if let Some(path) = &args.output {
        output::export_csv(&outcomes, path)?;
        info!("Results exported to {:?}", path);
    }

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
