// src/watch/mod.rs

//! Watch mode: rebuild the stylesheet whenever a source changes.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the
//!   registered folders.
//! - Filtering events down to recognized stylesheet sources.
//! - (Optionally) content hashing, so a touch without edits does not rebuild.
//!
//! The builder stays synchronous; events are funneled through one channel and
//! handled one batch at a time, so builds never overlap.

pub mod hash;
pub mod watcher;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::builder::Builder;
use crate::errors::Result;
use crate::types::{BuildOutcome, ScanMode};

pub use hash::{compute_file_hash, compute_hash_for_paths};
pub use watcher::{spawn_watcher, watch_roots, WatcherHandle};

/// State carried between rebuilds in watch mode.
#[derive(Debug)]
pub struct WatchSession {
    builder: Builder,
    roots: Vec<PathBuf>,
    use_hash: bool,
    last_hash: Option<String>,
}

impl WatchSession {
    /// `roots` are the folders as the watcher reports them (usually
    /// canonicalized versions of the builder's folders).
    pub fn new(builder: Builder, roots: Vec<PathBuf>, use_hash: bool) -> Self {
        Self {
            builder,
            roots,
            use_hash,
            last_hash: None,
        }
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// True if `path` is a recognized source inside one of the watched roots.
    pub fn is_relevant(&self, path: &Path) -> bool {
        if !self.builder.source_filter().matches(path) {
            return false;
        }
        match self.builder.config().options.scan {
            ScanMode::Shallow => path
                .parent()
                .map(|parent| self.roots.iter().any(|root| root == parent))
                .unwrap_or(false),
            ScanMode::Recursive => self.roots.iter().any(|root| path.starts_with(root)),
        }
    }

    /// React to a change: rebuild if stale, skipping when hashing shows the
    /// sources are byte-for-byte what was last built.
    pub fn rebuild(&mut self) -> Result<BuildOutcome> {
        let hash = if self.use_hash {
            let sources = self.builder.sources()?;
            Some(compute_hash_for_paths(self.builder.filesystem(), &sources)?)
        } else {
            None
        };

        if hash.is_some() && hash == self.last_hash && self.output_exists() {
            debug!("source content unchanged; skipping rebuild");
            return Ok(BuildOutcome::UpToDate);
        }

        let outcome = self.builder.build(false)?;
        if hash.is_some() {
            self.last_hash = hash;
        }
        Ok(outcome)
    }

    fn output_exists(&self) -> bool {
        self.builder
            .config()
            .output_file
            .as_deref()
            .map(|p| self.builder.filesystem().exists(p))
            .unwrap_or(false)
    }
}

/// Run watch mode until Ctrl-C.
///
/// Does an initial build, then rebuilds on every relevant batch of events.
/// Build errors are logged and the loop keeps going, so a syntax error while
/// editing does not end the session.
pub async fn run_watch(builder: Builder, use_hash: bool) -> anyhow::Result<()> {
    let roots = watch_roots(&builder.config().folders);
    let scan = builder.config().options.scan;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    let _handle = spawn_watcher(&roots, scan, tx)?;

    let mut session = WatchSession::new(builder, roots, use_hash);
    report(session.rebuild());

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!("failed to listen for Ctrl+C: {e}");
                }
                info!("shutdown requested; leaving watch mode");
                break;
            }
            batch = rx.recv() => {
                let Some(mut paths) = batch else {
                    debug!("watcher channel closed");
                    break;
                };
                // Coalesce whatever else is already queued into this batch.
                while let Ok(more) = rx.try_recv() {
                    paths.extend(more);
                }
                if paths.iter().any(|p| session.is_relevant(p)) {
                    report(session.rebuild());
                } else {
                    debug!(?paths, "ignoring unrelated change");
                }
            }
        }
    }

    Ok(())
}

fn report(result: Result<BuildOutcome>) {
    match result {
        Ok(BuildOutcome::Built) => info!("stylesheet rebuilt"),
        Ok(BuildOutcome::UpToDate) => debug!("stylesheet already up to date"),
        Err(err) => error!("build failed: {err}"),
    }
}
