use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use scss_builder::compiler::{CompileOutput, CompileRequest, SourcemapOptions, StylesheetCompiler};
use scss_builder::OutputStyle;

/// What the fake saw on one `compile` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCompile {
    pub source: String,
    pub import_paths: Vec<PathBuf>,
    pub style: OutputStyle,
    pub sourcemap: Option<SourcemapOptions>,
}

/// A fake compiler that:
/// - records every request it receives
/// - renders the source deterministically (`compact:` / `expanded:` prefix)
/// - fails on any source containing `!fail`
/// - returns a tiny map body and appends a `sourceMappingURL` comment when a
///   sourcemap is requested.
#[derive(Debug, Clone, Default)]
pub struct FakeCompiler {
    calls: Arc<Mutex<Vec<RecordedCompile>>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded calls; stays valid after the compiler is
    /// moved into a builder.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCompile>>> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// What the fake renders for `source` in `style`, without a sourcemap.
    pub fn render(source: &str, style: OutputStyle) -> String {
        match style {
            OutputStyle::Compact => format!("compact:{}", source.replace(char::is_whitespace, "")),
            OutputStyle::Expanded => format!("expanded:\n{source}\n"),
        }
    }
}

impl StylesheetCompiler for FakeCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput> {
        self.calls.lock().unwrap().push(RecordedCompile {
            source: request.source.to_string(),
            import_paths: request.import_paths.to_vec(),
            style: request.style,
            sourcemap: request.sourcemap.cloned(),
        });

        if request.source.contains("!fail") {
            bail!("fake syntax error: unexpected `!fail`");
        }

        let mut css = Self::render(request.source, request.style);
        let sourcemap = request.sourcemap.map(|opts| {
            css.push_str(&format!("\n/*# sourceMappingURL={} */", opts.url));
            format!(
                "{{\"version\":3,\"file\":\"{}\",\"sources\":[\"{}\"]}}",
                opts.output_name, opts.source_name
            )
        });

        Ok(CompileOutput { css, sourcemap })
    }
}
