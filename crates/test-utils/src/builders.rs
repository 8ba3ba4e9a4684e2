#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use scss_builder::config::{BuildSection, OptionsSection, ProjectFile, RawProjectFile, WatchSection};
use scss_builder::fs::mock::MockFileSystem;
use scss_builder::{Builder, OutputStyle, ScanMode};

use crate::fake_compiler::FakeCompiler;

/// Builder for `ProjectFile` to simplify test setup.
pub struct ProjectFileBuilder {
    config: RawProjectFile,
}

impl ProjectFileBuilder {
    pub fn new(entry: &str, output: &str) -> Self {
        Self {
            config: RawProjectFile {
                build: BuildSection {
                    entry: PathBuf::from(entry),
                    output: PathBuf::from(output),
                    folders: Vec::new(),
                    style: OutputStyle::Compact,
                    sourcemap_url: None,
                },
                options: OptionsSection::default(),
                watch: WatchSection::default(),
            },
        }
    }

    pub fn folder(mut self, folder: &str) -> Self {
        self.config.build.folders.push(PathBuf::from(folder));
        self
    }

    pub fn expanded(mut self) -> Self {
        self.config.build.style = OutputStyle::Expanded;
        self
    }

    pub fn sourcemap_url(mut self, url: &str) -> Self {
        self.config.build.sourcemap_url = Some(url.to_string());
        self
    }

    pub fn auto_create_folders(mut self, val: bool) -> Self {
        self.config.options.auto_create_folders = val;
        self
    }

    pub fn auto_create_files(mut self, val: bool) -> Self {
        self.config.options.auto_create_files = val;
        self
    }

    pub fn write_source_map(mut self, val: bool) -> Self {
        self.config.options.write_source_map = val;
        self
    }

    pub fn scan(mut self, scan: ScanMode) -> Self {
        self.config.options.scan = scan;
        self
    }

    pub fn use_hash(mut self, val: bool) -> Self {
        self.config.watch.use_hash = val;
        self
    }

    pub fn build(self) -> ProjectFile {
        ProjectFile::try_from(self.config).expect("Failed to build valid project from builder")
    }
}

/// The standard in-memory project used across tests:
///
/// ```text
/// /src/main.scss      body{color:red;}
/// /src/_vars.scss     $c: red;
/// /out/               (empty)
/// ```
pub struct Fixture {
    pub fs: MockFileSystem,
    pub compiler: FakeCompiler,
}

pub const ENTRY: &str = "/src/main.scss";
pub const OUTPUT: &str = "/out/style.css";
pub const MAP: &str = "/out/style.css.map";

impl Fixture {
    pub fn new() -> Self {
        let fs = MockFileSystem::new();
        fs.add_file(ENTRY, "body{color:red;}");
        fs.add_file("/src/_vars.scss", "$c: red;");
        fs.add_dir("/out");
        Self {
            fs,
            compiler: FakeCompiler::new(),
        }
    }

    /// An unconfigured builder over this fixture's filesystem and compiler.
    pub fn empty_builder(&self) -> Builder {
        Builder::new(Arc::new(self.fs.clone()), Box::new(self.compiler.clone()))
    }

    /// A builder with `/src` registered, output `/out/style.css` and entry
    /// `/src/main.scss`.
    pub fn builder(&self) -> Builder {
        let mut builder = self.empty_builder();
        builder.add_folder("/src").expect("register /src");
        builder.set_output_file(OUTPUT).expect("register output");
        builder.set_entry_file(ENTRY).expect("register entry");
        builder
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
