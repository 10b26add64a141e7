//! Database connection pool management.
//!
//! Initializes the SQLite connection pool with WAL mode enabled and creates
//! the database file if it does not exist.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{error, info};
use sqlx::SqlitePool;

use crate::errors::DatabaseError;

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist and enables WAL mode.
/// Called once at startup and again whenever the record store detects a
/// stale connection and reconnects.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<SqlitePool, DatabaseError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    // Enable WAL mode
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_creates_missing_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("geotail.db");
        assert!(!db_path.exists());

        let pool = init_db_pool_with_path(&db_path)
            .await
            .expect("pool should initialize");
        assert!(db_path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_pool_reuses_existing_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("geotail.db");

        let first = init_db_pool_with_path(&db_path).await.expect("first open");
        first.close().await;
        let second = init_db_pool_with_path(&db_path)
            .await
            .expect("second open should reuse the file");
        second.close().await;
    }
}
