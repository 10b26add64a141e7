//! Pipeline statistics tracking.
//!
//! Thread-safe counters shared between the tailer and the periodic progress
//! logger. All counters start at zero and only ever increase.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;

/// Counters for one tailing session.
#[derive(Debug, Default)]
pub struct TailStats {
    /// Complete lines read from the tail.
    pub lines_seen: AtomicUsize,
    /// Lines that yielded an extractable event.
    pub events_extracted: AtomicUsize,
    /// Events skipped because their dedup key was already stored.
    pub duplicates_skipped: AtomicUsize,
    /// Rows durably written.
    pub records_inserted: AtomicUsize,
    /// Lookups that degraded to an empty enrichment result.
    pub enrichment_failures: AtomicUsize,
    /// Lines whose persistence failed and were skipped.
    pub lines_failed: AtomicUsize,
}

impl TailStats {
    /// Fresh counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a one-line progress summary.
    pub fn log_progress(&self) {
        info!(
            "progress: {} lines seen, {} events, {} inserted, {} duplicates, {} enrichment failures, {} lines failed",
            self.lines_seen.load(Ordering::Relaxed),
            self.events_extracted.load(Ordering::Relaxed),
            self.records_inserted.load(Ordering::Relaxed),
            self.duplicates_skipped.load(Ordering::Relaxed),
            self.enrichment_failures.load(Ordering::Relaxed),
            self.lines_failed.load(Ordering::Relaxed),
        );
    }
}
