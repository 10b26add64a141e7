//! Record store: dedup lookup, insert, and connection liveness.
//!
//! Owns the SQLite pool and the path it was opened from, so a stale
//! connection can be replaced transparently. All statements are
//! parameterized.

use std::path::{Path, PathBuf};

use log::warn;
use sqlx::SqlitePool;

use super::migrations::bootstrap_schema;
use super::models::LogRecord;
use super::pool::init_db_pool_with_path;
use crate::errors::DatabaseError;

/// Persistence wrapper for the `logs` table.
pub struct RecordStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl RecordStore {
    /// Opens (creating if missing) the database at `db_path`.
    pub async fn connect(db_path: &Path) -> Result<Self, DatabaseError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    /// Idempotently ensures the schema exists. Safe on every startup.
    pub async fn bootstrap_schema(&self) -> Result<(), DatabaseError> {
        bootstrap_schema(&self.pool).await
    }

    /// Checks connection health; reconnects with a fresh pool on failure.
    ///
    /// Called once per line before any query. Failures mid-operation are not
    /// retried here; the per-line boundary is the retry unit.
    pub async fn ensure_live(&mut self) -> Result<(), DatabaseError> {
        if sqlx::query("SELECT 1").execute(&self.pool).await.is_ok() {
            return Ok(());
        }
        warn!("database connection is stale; reconnecting");
        self.pool.close().await;
        self.pool = init_db_pool_with_path(&self.db_path).await?;
        Ok(())
    }

    /// Point lookup on the dedup key (server_ip, timestamp, client_ip).
    ///
    /// Must be called before every insert; it is also what makes reprocessing
    /// an already-seen line free of enrichment API calls.
    pub async fn exists(
        &self,
        server_ip: &str,
        timestamp: &str,
        client_ip: &str,
    ) -> Result<bool, DatabaseError> {
        let row: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM logs
             WHERE server_ip = ? AND timestamp = ? AND client_ip = ?
             LIMIT 1",
        )
        .bind(server_ip)
        .bind(timestamp)
        .bind(client_ip)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    /// Inserts one record. Each accepted event is committed on its own before
    /// the next line is processed; there is no batching.
    pub async fn insert(&self, record: &LogRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO logs (
                server_ip, timestamp, client_ip, country_name, region,
                city, timezone, latitude, longitude, org
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.server_ip)
        .bind(&record.timestamp)
        .bind(&record.client_ip)
        .bind(&record.country_name)
        .bind(&record.region)
        .bind(&record.city)
        .bind(&record.timezone)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.org)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Total row count; used by the final report and by tests.
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Closes the underlying pool. Last step of the ordered shutdown.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
