//! Configuration constants.
//!
//! Defaults used by the CLI and by `Config::default()`.

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "./geotail.db";

/// Default enrichment service base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.findip.net";

/// Seconds to block after a 429 before retrying the same lookup.
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Per-request HTTP timeout in seconds (transport-level only; the 429 retry
/// loop itself has no timeout).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Seconds between progress log lines.
pub const PROGRESS_INTERVAL_SECS: u64 = 30;

/// Capacity of the watcher tick channel. Ticks are coalescing (any tick just
/// means "drain the file"), so a small buffer is enough and overflow is
/// harmless.
pub const WATCH_CHANNEL_CAPACITY: usize = 64;
