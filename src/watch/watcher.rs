// src/watch/watcher.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::types::ScanMode;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Canonicalize folders so they compare equal to the absolute paths notify
/// reports. Best-effort: a folder that cannot be canonicalized is kept as is.
pub fn watch_roots(folders: &[PathBuf]) -> Vec<PathBuf> {
    folders
        .iter()
        .map(|f| f.canonicalize().unwrap_or_else(|_| f.clone()))
        .collect()
}

/// Watch every folder in `roots` and forward the paths of each relevant
/// notify event into `tx`.
///
/// Folders are watched non-recursively unless `scan` is `Recursive`, which
/// mirrors how the staleness check looks at them.
pub fn spawn_watcher(
    roots: &[PathBuf],
    scan: ScanMode,
    tx: mpsc::UnboundedSender<Vec<PathBuf>>,
) -> Result<WatcherHandle> {
    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                if let Err(err) = tx.send(event.paths) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("scss-builder: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("scss-builder: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mode = match scan {
        ScanMode::Shallow => RecursiveMode::NonRecursive,
        ScanMode::Recursive => RecursiveMode::Recursive,
    };

    for root in roots {
        watcher
            .watch(root, mode)
            .with_context(|| format!("watching folder {:?}", root))?;
        info!("file watcher started on {:?}", root);
    }

    Ok(WatcherHandle { _inner: watcher })
}
