// Shared test helpers for pipeline setup and log-file manipulation.
//
// Used across the integration test files to reduce duplication.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use httptest::Server;
use tempfile::TempDir;

use geotail::{GeoClient, LogTailer, RecordStore, TailStats};

/// A fully wired pipeline over temp files, pointed at a mock enrichment
/// server. The tailer starts at end-of-file, so append lines after building.
pub struct TestPipeline {
    #[allow(dead_code)] // owns the temp dir for the test's lifetime
    pub dir: TempDir,
    pub log_path: PathBuf,
    pub db_path: PathBuf,
    pub tailer: LogTailer,
    pub stats: Arc<TailStats>,
}

/// Builds a pipeline whose enrichment client talks to `server` with a short
/// rate-limit cooldown suitable for tests.
#[allow(dead_code)] // used by other test files
pub async fn build_pipeline(server: &Server) -> TestPipeline {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("access.log");
    let db_path = dir.path().join("geotail.db");
    std::fs::File::create(&log_path).expect("create log file");

    let store = RecordStore::connect(&db_path).await.expect("store connect");
    store.bootstrap_schema().await.expect("bootstrap schema");

    let geo = GeoClient::new(
        Arc::new(reqwest::Client::new()),
        server.url_str(""),
        "test-token",
        Duration::from_millis(20),
    );

    let stats = Arc::new(TailStats::new());
    let tailer =
        LogTailer::new(&log_path, store, geo, Arc::clone(&stats)).expect("tailer should open");

    TestPipeline {
        dir,
        log_path,
        db_path,
        tailer,
        stats,
    }
}

/// Appends one line (with trailing newline) to the log file.
#[allow(dead_code)]
pub fn append_line(path: &Path, line: &str) {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .expect("open log for append");
    writeln!(file, "{line}").expect("append line");
}

/// Appends raw bytes without a trailing newline.
#[allow(dead_code)]
pub fn append_partial(path: &Path, text: &str) {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .expect("open log for append");
    write!(file, "{text}").expect("append partial");
}

/// Opens a read-only pool over the test database.
#[allow(dead_code)]
pub async fn open_db(db_path: &Path) -> sqlx::SqlitePool {
    sqlx::SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy()))
        .await
        .expect("open test database")
}

/// Total number of rows in `logs`.
#[allow(dead_code)]
pub async fn count_rows(db_path: &Path) -> i64 {
    let pool = open_db(db_path).await;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
        .fetch_one(&pool)
        .await
        .expect("count rows");
    pool.close().await;
    count
}
