//! geotail library: access-log tailing with geolocation enrichment.
//!
//! Tails a continuously appended web-server access log, extracts the
//! server/client IP pair and request timestamp from each new line, enriches
//! the client IP through an external geolocation service, and persists
//! deduplicated records in a SQLite database.
//!
//! # Example
//!
//! ```no_run
//! use geotail::{run_tail, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     log_path: "/var/log/nginx/access.log".into(),
//!     token: "secret".into(),
//!     ..Default::default()
//! };
//!
//! let report = run_tail(config).await?;
//! println!("{} lines seen, {} records inserted",
//!          report.lines_seen, report.records_inserted);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call library functions within an async context.

#![warn(missing_docs)]

pub mod config;
mod enrich;
mod errors;
mod extract;
pub mod initialization;
mod stats;
mod storage;
mod tailer;
mod watcher;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use enrich::{GeoClient, GeoInfo};
pub use errors::{DatabaseError, EnrichError, InitializationError, TailerError};
pub use extract::{extract_event, ExtractedEvent};
pub use run::{run_tail, TailReport};
pub use stats::TailStats;
pub use storage::{LogRecord, RecordStore};
pub use tailer::LogTailer;
pub use watcher::FileWatcher;

// Internal run module (wiring and the event loop)
mod run {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use log::{error, info, warn};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::config::{Config, PROGRESS_INTERVAL_SECS, WATCH_CHANNEL_CAPACITY};
    use crate::enrich::GeoClient;
    use crate::initialization::init_client;
    use crate::stats::TailStats;
    use crate::storage::RecordStore;
    use crate::tailer::LogTailer;
    use crate::watcher::FileWatcher;

    /// Summary of a completed tailing session.
    #[derive(Debug, Clone)]
    pub struct TailReport {
        /// Complete lines read from the tail.
        pub lines_seen: usize,
        /// Lines that yielded an extractable event.
        pub events_extracted: usize,
        /// Events skipped because they were already stored.
        pub duplicates_skipped: usize,
        /// Rows written to the database.
        pub records_inserted: usize,
        /// Lookups that degraded to an empty enrichment result.
        pub enrichment_failures: usize,
    }

    /// Tails the configured log file until interrupted.
    ///
    /// Wires the record store, enrichment client, tailer, and file watcher
    /// together, then loops over watcher ticks. On ctrl-c the notifier is
    /// stopped first, the progress task is cancelled, and the database
    /// connection is released last.
    ///
    /// # Errors
    ///
    /// Returns an error if the database, HTTP client, log file, or watcher
    /// cannot be initialized. Per-line failures never abort the loop.
    pub async fn run_tail(config: Config) -> Result<TailReport> {
        let store = RecordStore::connect(&config.db_path)
            .await
            .context("Failed to initialize database")?;
        store
            .bootstrap_schema()
            .await
            .context("Failed to bootstrap schema")?;

        let client = init_client(&config)
            .await
            .context("Failed to initialize HTTP client")?;
        let geo = GeoClient::new(
            client,
            config.api_base_url.clone(),
            config.token.clone(),
            config.cooldown(),
        );

        let stats = Arc::new(TailStats::new());
        let mut tailer = LogTailer::new(&config.log_path, store, geo, Arc::clone(&stats))
            .context("Failed to open log file")?;

        let (tick_tx, mut tick_rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let watcher = FileWatcher::new(&config.log_path, tick_tx)
            .context("Failed to start file watcher")?;

        info!(
            "tailing {} (records to {})",
            config.log_path.display(),
            config.db_path.display()
        );

        let cancel = CancellationToken::new();
        let cancel_progress = cancel.child_token();
        let stats_for_progress = Arc::clone(&stats);
        let progress_task = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(PROGRESS_INTERVAL_SECS));
            interval.tick().await; // immediate first tick carries no news
            loop {
                tokio::select! {
                    _ = interval.tick() => stats_for_progress.log_progress(),
                    _ = cancel_progress.cancelled() => break,
                }
            }
        });

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("failed to listen for interrupt: {e}");
                    }
                    info!("interrupt received; shutting down");
                    break;
                }
                tick = tick_rx.recv() => match tick {
                    Some(()) => {
                        if let Err(e) = tailer.process_new_lines().await {
                            error!("error draining log file: {e}");
                        }
                    }
                    None => {
                        warn!("watch channel closed; stopping");
                        break;
                    }
                }
            }
        }

        // Ordered shutdown: notifier first, then the progress task, then the
        // database connection.
        drop(watcher);
        cancel.cancel();
        let _ = progress_task.await;
        tailer.into_store().close().await;

        stats.log_progress();
        Ok(TailReport {
            lines_seen: stats.lines_seen.load(Ordering::Relaxed),
            events_extracted: stats.events_extracted.load(Ordering::Relaxed),
            duplicates_skipped: stats.duplicates_skipped.load(Ordering::Relaxed),
            records_inserted: stats.records_inserted.load(Ordering::Relaxed),
            enrichment_failures: stats.enrichment_failures.load(Ordering::Relaxed),
        })
    }
}
