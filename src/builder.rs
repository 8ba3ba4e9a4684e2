// src/builder.rs

//! The build orchestrator.
//!
//! A [`Builder`] owns one [`BuildConfig`] for the whole session. Setup
//! operations validate paths against the filesystem as they are registered;
//! after that, `needs_rebuild` / `build` / `compiled_code` can be called any
//! number of times. Nothing compiled is cached between calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::compiler::{
    sourcemap_options, CompileRequest, GrassCompiler, SourcemapOptions, StylesheetCompiler,
};
use crate::config::{resolve, ProjectFile};
use crate::errors::{BuilderError, Result};
use crate::fs::{parent_dir, FileSystem, RealFileSystem};
use crate::sources::{collect_sources, find_newer_source, SourceFilter};
use crate::types::{BuildOutcome, OutputStyle, ScanMode};

/// Content written into an entry file created by `auto_create_files`.
pub const ENTRY_PLACEHOLDER: &str = "/* entry stylesheet created by scss-builder */\n";

/// Feature toggles for a build session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Create a missing folder (or output parent) with a single-level mkdir.
    pub auto_create_folders: bool,
    /// Create a missing entry file containing [`ENTRY_PLACEHOLDER`].
    pub auto_create_files: bool,
    /// Write `<output>.map` when a sourcemap URL is set.
    ///
    /// With this off the compiler is still asked for a sourcemap, so the CSS
    /// keeps referencing the URL, but no map file is written.
    pub write_source_map: bool,
    pub scan: ScanMode,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            auto_create_folders: false,
            auto_create_files: false,
            write_source_map: true,
            scan: ScanMode::Shallow,
        }
    }
}

/// Session configuration, mutated only through the `Builder` setters.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub output_file: Option<PathBuf>,
    pub folders: Vec<PathBuf>,
    pub entry_file: Option<PathBuf>,
    pub sourcemap_base_url: Option<String>,
    pub style: OutputStyle,
    pub options: BuildOptions,
}

/// Sourcemap produced by a compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourcemap {
    /// Companion path, `<output>.map`.
    pub path: PathBuf,
    pub body: String,
}

/// Result of [`Builder::compile_once`]. Nothing has been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStylesheet {
    pub css: String,
    pub sourcemap: Option<Sourcemap>,
}

pub struct Builder {
    config: BuildConfig,
    fs: Arc<dyn FileSystem>,
    compiler: Box<dyn StylesheetCompiler>,
    filter: SourceFilter,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl Default for Builder {
    /// Real filesystem plus the `grass` compiler.
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem), Box::new(GrassCompiler::new()))
    }
}

impl Builder {
    pub fn new(fs: Arc<dyn FileSystem>, compiler: Box<dyn StylesheetCompiler>) -> Self {
        Self::with_options(fs, compiler, BuildOptions::default())
    }

    pub fn with_options(
        fs: Arc<dyn FileSystem>,
        compiler: Box<dyn StylesheetCompiler>,
        options: BuildOptions,
    ) -> Self {
        Self {
            config: BuildConfig {
                options,
                ..BuildConfig::default()
            },
            fs,
            compiler,
            filter: SourceFilter::default(),
        }
    }

    /// Build a session from a validated project file.
    ///
    /// Options are applied first so auto-creation affects registration;
    /// then folders, output, entry, style and sourcemap URL, in that order.
    /// Relative paths are resolved against `root`.
    pub fn from_project(
        project: &ProjectFile,
        root: &Path,
        fs: Arc<dyn FileSystem>,
        compiler: Box<dyn StylesheetCompiler>,
    ) -> Result<Self> {
        let options = BuildOptions {
            auto_create_folders: project.options.auto_create_folders,
            auto_create_files: project.options.auto_create_files,
            write_source_map: project.options.write_source_map,
            scan: project.options.scan,
        };
        let mut builder = Self::with_options(fs, compiler, options);

        for folder in project.build.folders.iter() {
            builder.add_folder(resolve(root, folder))?;
        }
        builder.set_output_file(resolve(root, &project.build.output))?;
        builder.set_entry_file(resolve(root, &project.build.entry))?;
        builder.set_output_expanded(project.build.style == OutputStyle::Expanded);
        if let Some(url) = &project.build.sourcemap_url {
            builder.set_sourcemap_base_url(url.clone());
        }

        Ok(builder)
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn set_auto_create_folders(&mut self, enabled: bool) {
        self.config.options.auto_create_folders = enabled;
    }

    pub fn set_auto_create_files(&mut self, enabled: bool) {
        self.config.options.auto_create_files = enabled;
    }

    pub fn set_write_source_map(&mut self, enabled: bool) {
        self.config.options.write_source_map = enabled;
    }

    pub fn set_scan_mode(&mut self, scan: ScanMode) {
        self.config.options.scan = scan;
    }

    /// Register a source/import folder. Duplicates are kept.
    pub fn add_folder(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();

        if !self.fs.exists(&path) && self.config.options.auto_create_folders {
            self.create_dir(&path)?;
        }

        if !self.fs.is_dir(&path) {
            return Err(BuilderError::config(&path, "not a valid source folder"));
        }

        debug!(folder = ?path, "registered source folder");
        self.config.folders.push(path);
        Ok(())
    }

    /// Register the single build target. The file itself is not touched.
    pub fn set_output_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let parent = parent_dir(&path);

        if !self.fs.is_dir(&parent) && self.config.options.auto_create_folders {
            self.create_dir(&parent)?;
        }

        if !self.fs.is_dir(&parent) {
            return Err(BuilderError::config(
                &parent,
                "parent folder of the output file does not exist",
            ));
        }

        debug!(output = ?path, "registered output file");
        self.config.output_file = Some(path);
        Ok(())
    }

    /// Register the file that seeds compilation.
    pub fn set_entry_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();

        if !self.fs.exists(&path) && self.config.options.auto_create_files {
            self.fs
                .write(&path, ENTRY_PLACEHOLDER.as_bytes())
                .map_err(|e| {
                    BuilderError::config(&path, format!("could not create entry file: {e}"))
                })?;
            info!(entry = ?path, "created placeholder entry file");
        }

        if !self.fs.is_file(&path) {
            return Err(BuilderError::config(&path, "entry file does not exist"));
        }

        debug!(entry = ?path, "registered entry file");
        self.config.entry_file = Some(path);
        Ok(())
    }

    /// Select expanded (`true`) or compact (`false`, the default) rendering.
    pub fn set_output_expanded(&mut self, expanded: bool) {
        self.config.style = if expanded {
            OutputStyle::Expanded
        } else {
            OutputStyle::Compact
        };
    }

    /// Store the public URL prefix for sourcemaps. Takes effect on the next
    /// compile; nothing is written here.
    pub fn set_sourcemap_base_url(&mut self, url: impl Into<String>) {
        self.config.sourcemap_base_url = Some(url.into());
    }

    /// True if the output is missing or older than any recognized source.
    pub fn needs_rebuild(&self) -> Result<bool> {
        let output = self.require_output()?;

        if !self.fs.exists(output) {
            debug!(output = ?output, "output missing; rebuild needed");
            return Ok(true);
        }

        let output_mtime = self
            .fs
            .modified(output)
            .map_err(|e| BuilderError::io(output, e))?;

        let newer = find_newer_source(
            self.fs.as_ref(),
            &self.config.folders,
            &self.filter,
            self.config.options.scan,
            output_mtime,
        )?;

        Ok(newer.is_some())
    }

    /// Compile the entry file and return the result without writing anything.
    pub fn compile_once(&self) -> Result<CompiledStylesheet> {
        let entry = self.require_entry()?;
        let source = self
            .fs
            .read_to_string(entry)
            .map_err(|e| BuilderError::io(entry, e))?;

        let sourcemap: Option<SourcemapOptions> = match &self.config.sourcemap_base_url {
            Some(base) => Some(sourcemap_options(
                self.require_output()?,
                entry,
                &self.config.folders,
                base,
            )),
            None => None,
        };

        let request = CompileRequest {
            source: &source,
            import_paths: &self.config.folders,
            style: self.config.style,
            sourcemap: sourcemap.as_ref(),
        };

        let output = self
            .compiler
            .compile(&request)
            .map_err(|e| BuilderError::Compile {
                entry: entry.to_path_buf(),
                message: format!("{e:#}"),
            })?;

        let sourcemap = match (sourcemap, output.sourcemap) {
            (Some(opts), Some(body)) => Some(Sourcemap {
                path: opts.write_to,
                body,
            }),
            _ => None,
        };

        Ok(CompiledStylesheet {
            css: output.css,
            sourcemap,
        })
    }

    /// Recompile and overwrite the output when stale or forced.
    ///
    /// The output is only written after a successful compile, so a failure
    /// leaves the previous file untouched.
    pub fn build(&self, force: bool) -> Result<BuildOutcome> {
        let stale = self.needs_rebuild()?;
        if !force && !stale {
            debug!("output up to date; skipping build");
            return Ok(BuildOutcome::UpToDate);
        }

        let output = self.require_output()?;
        let compiled = self.compile_once()?;

        // Map first: the stylesheet is the last write, so any failure leaves
        // the previous output in place.
        match &compiled.sourcemap {
            Some(map) if self.config.options.write_source_map => {
                self.fs
                    .write(&map.path, map.body.as_bytes())
                    .map_err(|e| BuilderError::io(&map.path, e))?;
                debug!(sourcemap = ?map.path, "wrote sourcemap");
            }
            Some(map) => {
                debug!(sourcemap = ?map.path, "sourcemap referenced but not written");
            }
            None => {}
        }

        self.fs
            .write(output, compiled.css.as_bytes())
            .map_err(|e| BuilderError::io(output, e))?;
        info!(output = ?output, bytes = compiled.css.len(), forced = force && !stale, "wrote stylesheet");

        Ok(BuildOutcome::Built)
    }

    /// Freshly compiled text when stale or forced, otherwise the output
    /// file's current content. Never writes.
    pub fn compiled_code(&self, force: bool) -> Result<String> {
        if self.needs_rebuild()? || force {
            return Ok(self.compile_once()?.css);
        }

        let output = self.require_output()?;
        self.fs.read_to_string(output).map_err(|e| {
            warn!(output = ?output, "output vanished after freshness check");
            BuilderError::io(output, e)
        })
    }

    /// All recognized source files under the registered folders.
    pub fn sources(&self) -> Result<Vec<PathBuf>> {
        collect_sources(
            self.fs.as_ref(),
            &self.config.folders,
            &self.filter,
            self.config.options.scan,
        )
    }

    pub(crate) fn filesystem(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub(crate) fn source_filter(&self) -> &SourceFilter {
        &self.filter
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.fs.create_dir(path).map_err(|e| {
            BuilderError::config(path, format!("could not create folder: {e}"))
        })?;
        info!(folder = ?path, "created missing folder");
        Ok(())
    }

    fn require_output(&self) -> Result<&Path> {
        self.config
            .output_file
            .as_deref()
            .ok_or_else(|| BuilderError::config("", "output file not configured"))
    }

    fn require_entry(&self) -> Result<&Path> {
        self.config
            .entry_file
            .as_deref()
            .ok_or_else(|| BuilderError::config("", "entry file not configured"))
    }
}
