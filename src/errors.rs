//! Error type definitions.
//!
//! Each subsystem gets its own `thiserror` enum; the orchestration layer in
//! `run` wraps them with `anyhow::Context` where extra context helps.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::StatusCode;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Error types for geolocation enrichment.
///
/// Rate limiting (HTTP 429) never surfaces here: the client absorbs it with a
/// blocking cooldown and retry. Everything else degrades to an empty
/// enrichment result at the call site, so these errors are loggable but never
/// fatal to the pipeline.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// Transport-level failure talking to the enrichment endpoint.
    #[error("enrichment request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-200, non-429 status.
    #[error("enrichment service returned status {0}")]
    Status(StatusCode),

    /// The endpoint answered 200 but the body did not decode.
    #[error("enrichment response could not be decoded: {0}")]
    Decode(String),
}

/// Error types for the log tailer and file watcher.
#[derive(Error, Debug)]
pub enum TailerError {
    /// I/O failure reading the tailed file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to initialize the filesystem watcher.
    #[error("failed to create watcher: {0}")]
    WatcherInit(#[from] notify::Error),

    /// The log file does not exist at startup.
    #[error("log file does not exist: {0}")]
    FileNotFound(PathBuf),

    /// The log file path has no parent directory to watch.
    #[error("log file path has no parent directory: {0}")]
    NoParentDirectory(PathBuf),
}
