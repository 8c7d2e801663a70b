//! File watching for rebuild-on-change.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A watched input was created or modified
    Changed(PathBuf),

    /// A watched input was removed
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Changed(path) | WatchEvent::Removed(path) => path,
        }
    }
}

/// Watches a fixed set of input files.
///
/// Parent directories are watched rather than the files themselves so that
/// editors which save by replacing the file keep being tracked. Events for
/// other files in those directories, such as generated output, are dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given files.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        files: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let targets: Vec<PathBuf> = files.iter().map(|f| resolve(f)).collect();
        let dirs: BTreeSet<PathBuf> = targets
            .iter()
            .filter_map(|t| t.parent().map(Path::to_path_buf))
            .collect();

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for dir in &dirs {
            if dir.exists() {
                watcher
                    .watch(dir, RecursiveMode::NonRecursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        std::thread::spawn(move || {
            let debounce_duration = Duration::from_millis(100);
            let mut pending: Vec<WatchEvent> = Vec::new();

            loop {
                // Wait indefinitely when idle; once events are pending, flush
                // them after the burst has been quiet for the debounce window.
                let received = if pending.is_empty() {
                    sync_rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                } else {
                    sync_rx.recv_timeout(debounce_duration)
                };

                match received {
                    Ok(event) => {
                        let matched = event
                            .paths
                            .iter()
                            .filter(|path| targets.contains(&resolve(path)))
                            .filter_map(|path| classify_event(path, &event.kind));
                        for watch_event in matched {
                            merge_pending(&mut pending, watch_event);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if !flush(&async_tx, &mut pending) {
                            return;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        flush(&async_tx, &mut pending);
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Record `event`, replacing any earlier pending event for the same path.
fn merge_pending(pending: &mut Vec<WatchEvent>, event: WatchEvent) {
    pending.retain(|e| e.path() != event.path());
    pending.push(event);
}

/// Send every pending event. Returns `false` once the receiver is gone.
fn flush(tx: &async_mpsc::Sender<WatchEvent>, pending: &mut Vec<WatchEvent>) -> bool {
    pending.drain(..).all(|event| tx.blocking_send(event).is_ok())
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        _ => None,
    }
}

/// Absolute form of a path whose file may not exist.
fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or(absolute),
        _ => absolute,
    }
}
