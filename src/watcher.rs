//! Filesystem change notifier for the tailed log file.
//!
//! Watches the log file's parent directory (non-recursive) and forwards a
//! tick over an mpsc channel whenever the watched path is created or
//! modified. The notify callback is kept lightweight: it only filters and
//! `try_send`s; all file I/O happens in the run loop that drains the ticks.
//! Ticks are coalescing, so a dropped tick on a full channel is harmless as
//! long as another follows, which it does for an actively written log.

use std::path::{Path, PathBuf};

use log::{debug, error, trace, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::errors::TailerError;

/// Watches one log file for modification.
///
/// Dropping the watcher stops the subscription; the run loop relies on that
/// for the "stop the notifier first" step of ordered shutdown.
pub struct FileWatcher {
    /// Kept alive to maintain the watch subscription.
    #[allow(dead_code)]
    watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Starts watching `log_path`'s parent directory, sending a tick on
    /// `tx` whenever the file at `log_path` changes.
    ///
    /// The directory rather than the file is watched so rename-based
    /// rotation (the path re-appearing as a new file) is still observed.
    pub fn new(log_path: &Path, tx: mpsc::Sender<()>) -> Result<Self, TailerError> {
        let parent = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| TailerError::NoParentDirectory(log_path.to_path_buf()))?
            .to_path_buf();
        let watched = log_path.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                handle_notify_event(res, &watched, &tx);
            },
            Config::default(),
        )?;
        watcher.watch(&parent, RecursiveMode::NonRecursive)?;

        debug!(
            "watching {} for changes to {}",
            parent.display(),
            log_path.display()
        );

        Ok(Self { watcher })
    }
}

/// Filters notify events down to "the watched file changed" ticks.
fn handle_notify_event(
    res: Result<Event, notify::Error>,
    watched: &PathBuf,
    tx: &mpsc::Sender<()>,
) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            error!("file watcher error: {e}");
            return;
        }
    };

    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p == watched);
    if !relevant {
        trace!("ignoring event {:?}", event.kind);
        return;
    }

    // try_send keeps the notify thread from blocking; a full channel means
    // a drain is already pending.
    if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(()) {
        warn!("watch channel closed; notifier is orphaned");
    }
}
