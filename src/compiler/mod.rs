// src/compiler/mod.rs

//! Boundary to the external stylesheet compiler.
//!
//! The builder only ever talks to a [`StylesheetCompiler`]; the real
//! implementation is [`GrassCompiler`], tests substitute a fake.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::types::OutputStyle;

pub mod grass;

pub use self::grass::GrassCompiler;

/// Sourcemap settings for a single compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcemapOptions {
    /// Where the companion map lives on disk (`<output>.map`).
    pub write_to: PathBuf,
    /// Public URL the compiled CSS should reference.
    pub url: String,
    /// File name of the generated stylesheet, recorded in the map.
    pub output_name: String,
    /// Entry path relative to the first import path containing it, recorded
    /// in the map. Falls back to the bare file name.
    pub source_name: String,
}

/// Everything the compiler needs for one invocation.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub source: &'a str,
    pub import_paths: &'a [PathBuf],
    pub style: OutputStyle,
    pub sourcemap: Option<&'a SourcemapOptions>,
}

/// Compiled text plus the sourcemap body when one was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub css: String,
    pub sourcemap: Option<String>,
}

/// Narrow interface to a stylesheet compiler.
///
/// Failures are opaque to the builder: whatever the implementation reports
/// is wrapped into `BuilderError::Compile` without interpretation.
pub trait StylesheetCompiler: Send + Sync {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput>;
}

/// Companion sourcemap path for an output file: `<output>.map` next to it.
pub fn sourcemap_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".map");
    output.with_file_name(name)
}

/// Build the sourcemap options for `output`, given the public base URL.
///
/// The URL is a plain concatenation of the base and the companion file name,
/// so the base is expected to end with `/`.
pub fn sourcemap_options(
    output: &Path,
    entry: &Path,
    import_paths: &[PathBuf],
    base_url: &str,
) -> SourcemapOptions {
    let write_to = sourcemap_path(output);
    let map_name = write_to
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    SourcemapOptions {
        url: format!("{base_url}{map_name}"),
        write_to,
        output_name: output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        source_name: source_name(entry, import_paths),
    }
}

fn source_name(entry: &Path, import_paths: &[PathBuf]) -> String {
    import_paths
        .iter()
        .find_map(|root| entry.strip_prefix(root).ok())
        .or_else(|| entry.file_name().map(Path::new))
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}
