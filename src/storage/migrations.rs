//! Schema bootstrap.
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements, safe to run on every
//! startup. The IP columns are plain TEXT so full IPv6 literals fit; the
//! original tool's VARCHAR(15) server_ip column truncated them and is not
//! replicated here.

use sqlx::SqlitePool;

use crate::errors::DatabaseError;

/// Ensures the `logs` table and its dedup-key index exist.
///
/// The (server_ip, timestamp, client_ip) triple is the dedup key. Uniqueness
/// is enforced by an existence check before insert rather than a storage
/// constraint, matching the write path's semantics; the index keeps that
/// point lookup cheap.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            server_ip TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            client_ip TEXT NOT NULL,
            country_name TEXT,
            region TEXT,
            city TEXT,
            timezone TEXT,
            latitude REAL,
            longitude REAL,
            org TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_logs_dedup_key
         ON logs (server_ip, timestamp, client_ip)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
