mod commands;
mod logging;
mod progress;

use std::process;

use anyhow::Context;
use clap::Parser;
use collector_core::sync::SyncOutcome;
use collector_core::{AppConfig, CollectorEngine, RunResult};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let code = run();
    process::exit(code);
}

/// Returns the process exit code. The logging guard is dropped before the
/// caller exits, so buffered log lines reach the log file.
fn run() -> i32 {
    let args = Cli::parse();
    let _guard = logging::init_logger(args.debug);

    let config = match collector_core::config::load_configuration() {
        Ok(config) => args.apply(config),
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return 1;
        }
    };

    match args.command {
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            0
        }
        None => match run_collector(config) {
            Ok(()) => 0,
            Err(err) => {
                error!("Error: {:#}", err);
                1
            }
        },
    }
}

fn run_collector(config: AppConfig) -> anyhow::Result<()> {
    let engine = CollectorEngine::new(config);
    let reporter = CliReporter::new();
    let result = engine.run(&reporter).with_context(|| {
        format!(
            "collector run failed (catalog: {}, documents: {})",
            engine.config().catalog_path,
            engine.config().documents_root
        )
    })?;

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &RunResult) {
    if let Some(scan) = &result.scan {
        info!(
            "Found {} book(s) associated with collections",
            format!("{}", scan.books_found).green(),
        );
        info!(
            "Dropped {} of {} empty (inactive) collections",
            format!("{}", scan.collections_dropped).yellow(),
            scan.collections_found,
        );
    }

    match &result.sync {
        SyncOutcome::Committed { status } => info!(
            "{} command(s) committed (status {})",
            format!("{}", result.commands).cyan(),
            status
        ),
        SyncOutcome::Printed => info!(
            "{} command(s) printed, nothing committed",
            format!("{}", result.commands).cyan()
        ),
        SyncOutcome::Empty => info!("Nothing to commit"),
        // delivery is best effort; a re-run picks up from the persisted markers
        SyncOutcome::Failed(reason) => warn!("{}: {}", "Sync failed".red(), reason),
    }
}
