// src/sources.rs

//! Source discovery and the mtime-based staleness check.
//!
//! Only files whose name matches one of the recognized stylesheet patterns
//! (`*.scss`, `*.css`) take part. In `ScanMode::Shallow` nested folders are
//! skipped entirely; that is the documented contract and the default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, trace};

use crate::errors::{BuilderError, Result};
use crate::fs::FileSystem;
use crate::types::ScanMode;

/// Extensions considered stylesheet sources.
pub const RECOGNIZED_EXTENSIONS: [&str; 2] = ["scss", "css"];

/// Compiled file-name matcher for stylesheet sources.
#[derive(Clone)]
pub struct SourceFilter {
    set: GlobSet,
}

impl fmt::Debug for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFilter").finish_non_exhaustive()
    }
}

impl SourceFilter {
    /// Build a filter matching `*.<ext>` for each extension.
    pub fn for_extensions(extensions: &[&str]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for ext in extensions {
            let pattern = format!("*.{ext}");
            let glob = Glob::new(&pattern)
                .with_context(|| format!("invalid source pattern: {pattern}"))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .context("building stylesheet source globset")?;
        Ok(Self { set })
    }

    /// True if the file name of `path` is a recognized stylesheet.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.set.is_match(Path::new(name)))
            .unwrap_or(false)
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        // The built-in patterns are static and always valid.
        Self::for_extensions(&RECOGNIZED_EXTENSIONS)
            .unwrap_or_else(|e| panic!("built-in source patterns must compile: {e}"))
    }
}

/// Check that `folder` is an existing, listable directory.
pub fn ensure_readable_dir(fs: &dyn FileSystem, folder: &Path) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(folder) {
        return Err(BuilderError::io(
            folder,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "source folder not found or not a directory",
            ),
        ));
    }
    fs.read_dir(folder).map_err(|e| BuilderError::io(folder, e))
}

/// Collect every recognized source file under the given folders.
///
/// Order follows folder registration order, then directory listing order.
pub fn collect_sources(
    fs: &dyn FileSystem,
    folders: &[PathBuf],
    filter: &SourceFilter,
    scan: ScanMode,
) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for folder in folders {
        collect_in_dir(fs, folder, filter, scan, &mut out)?;
    }
    Ok(out)
}

fn collect_in_dir(
    fs: &dyn FileSystem,
    dir: &Path,
    filter: &SourceFilter,
    scan: ScanMode,
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in ensure_readable_dir(fs, dir)? {
        if fs.is_file(&entry) {
            if filter.matches(&entry) {
                out.push(entry);
            }
        } else if scan == ScanMode::Recursive && fs.is_dir(&entry) {
            collect_in_dir(fs, &entry, filter, scan, out)?;
        }
    }
    Ok(())
}

/// Return the first recognized source strictly newer than `since`, if any.
///
/// Folders are checked in order; a missing or unreadable folder fails before
/// any of its entries are compared. Directories are never compared, even
/// when their name ends in `.scss` or `.css`.
pub fn find_newer_source(
    fs: &dyn FileSystem,
    folders: &[PathBuf],
    filter: &SourceFilter,
    scan: ScanMode,
    since: SystemTime,
) -> Result<Option<PathBuf>> {
    for folder in folders {
        if let Some(found) = newer_in_dir(fs, folder, filter, scan, since)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn newer_in_dir(
    fs: &dyn FileSystem,
    dir: &Path,
    filter: &SourceFilter,
    scan: ScanMode,
    since: SystemTime,
) -> Result<Option<PathBuf>> {
    let entries = ensure_readable_dir(fs, dir)?;
    trace!(dir = ?dir, count = entries.len(), "scanning folder");

    for entry in entries {
        if fs.is_file(&entry) {
            if !filter.matches(&entry) {
                continue;
            }
            let mtime = fs.modified(&entry).map_err(|e| BuilderError::io(&entry, e))?;
            if mtime > since {
                debug!(source = ?entry, "source is newer than output");
                return Ok(Some(entry));
            }
        } else if scan == ScanMode::Recursive && fs.is_dir(&entry) {
            if let Some(found) = newer_in_dir(fs, &entry, filter, scan, since)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}
