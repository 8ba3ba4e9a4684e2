// src/compiler/grass.rs

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use tracing::debug;

use super::{CompileOutput, CompileRequest, SourcemapOptions, StylesheetCompiler};
use crate::types::OutputStyle;

/// `StylesheetCompiler` backed by the pure-Rust `grass` crate.
///
/// `grass` has no sourcemap support. When a map is requested we still hand
/// back a valid version-3 map (without mappings) and append the
/// `sourceMappingURL` comment, so browsers resolve the configured URL.
#[derive(Debug, Clone, Default)]
pub struct GrassCompiler {
    quiet: bool,
}

impl GrassCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress `@warn` / `@debug` output from the compiler.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

fn grass_style(style: OutputStyle) -> grass::OutputStyle {
    match style {
        OutputStyle::Compact => grass::OutputStyle::Compressed,
        OutputStyle::Expanded => grass::OutputStyle::Expanded,
    }
}

fn sourcemap_body(opts: &SourcemapOptions) -> Result<String> {
    let map = json!({
        "version": 3,
        "file": opts.output_name,
        "sources": [opts.source_name],
        "names": [],
        "mappings": "",
    });
    serde_json::to_string(&map).context("serializing sourcemap")
}

impl StylesheetCompiler for GrassCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput> {
        let options = grass::Options::default()
            .style(grass_style(request.style))
            .quiet(self.quiet)
            .load_paths(request.import_paths);

        debug!(
            style = %request.style,
            import_paths = request.import_paths.len(),
            "invoking grass"
        );

        let mut css = grass::from_string(request.source.to_owned(), &options)
            .map_err(|e| anyhow!("{e}"))?;

        let sourcemap = match request.sourcemap {
            Some(opts) => {
                if !css.is_empty() && !css.ends_with('\n') {
                    css.push('\n');
                }
                css.push_str(&format!("/*# sourceMappingURL={} */\n", opts.url));
                Some(sourcemap_body(opts)?)
            }
            None => None,
        };

        Ok(CompileOutput { css, sourcemap })
    }
}
