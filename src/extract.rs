//! Log line extraction.
//!
//! Pulls the server/client IP pair and the bracketed request timestamp out of
//! a raw access-log line. This is deliberately not a full access-log parser:
//! status codes, methods, user agents and the rest of the line grammar are
//! ignored. A line that does not yield at least two IP tokens and one
//! timestamp produces no event, which is normal and silent.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

/// Matches IPv4 dotted quads and full 8-group IPv6 literals.
///
/// Abbreviated IPv6 (`::`) forms are not matched. Known limitation, kept
/// deliberately: access logs written by nginx carry full literals.
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b|\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b")
        .expect("IP pattern is valid")
});

/// Matches the bracketed `DD/Mon/YYYY:HH:MM:SS +ZZZZ` timestamp token.
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2} [+-]\d{4})\]")
        .expect("timestamp pattern is valid")
});

/// Strftime format of the log's timestamp token.
const LOG_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Strftime format of the normalized timestamp persisted to the database.
pub const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One extractable event from a log line.
///
/// The first IP token on the line is the server, the second is the client;
/// any tokens beyond the second are ignored. The timestamp is normalized to
/// UTC at extraction time so the dedup key is stable across offset notations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEvent {
    /// First IP token on the line.
    pub server_ip: String,
    /// Second IP token on the line.
    pub client_ip: String,
    /// Request timestamp, normalized to UTC.
    pub timestamp: NaiveDateTime,
}

impl ExtractedEvent {
    /// Timestamp formatted the way it is stored and compared in the database.
    pub fn timestamp_sql(&self) -> String {
        self.timestamp.format(SQL_TIMESTAMP_FORMAT).to_string()
    }
}

/// Extracts an event from a raw log line.
///
/// Returns `None` when the line has fewer than two IP-like tokens, no
/// bracketed timestamp, or a timestamp that does not parse (e.g. a bogus
/// month abbreviation). None of those are errors; the line is simply skipped.
pub fn extract_event(line: &str) -> Option<ExtractedEvent> {
    let mut ips = IP_PATTERN.find_iter(line);
    let server_ip = ips.next()?.as_str().to_string();
    let client_ip = ips.next()?.as_str().to_string();

    let raw_timestamp = TIME_PATTERN.captures(line)?.get(1)?.as_str();
    let timestamp = DateTime::parse_from_str(raw_timestamp, LOG_TIMESTAMP_FORMAT)
        .ok()?
        .naive_utc();

    Some(ExtractedEvent {
        server_ip,
        client_ip,
        timestamp,
    })
}
