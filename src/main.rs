//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geotail` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geotail::initialization::init_logger_with;
use geotail::{run_tail, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists) so FINDIP_TOKEN
    // can be set there instead of being exported manually
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_tail(config).await {
        Ok(report) => {
            println!(
                "Processed {} line{} ({} recorded, {} duplicates, {} enrichment failures)",
                report.lines_seen,
                if report.lines_seen == 1 { "" } else { "s" },
                report.records_inserted,
                report.duplicates_skipped,
                report.enrichment_failures
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("geotail error: {:#}", e);
            process::exit(1);
        }
    }
}
