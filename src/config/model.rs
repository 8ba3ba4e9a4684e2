// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{OutputStyle, ScanMode};

/// Raw project file as read from TOML, before validation.
///
/// ```toml
/// [build]
/// entry = "scss/main.scss"
/// output = "public/css/style.css"
/// folders = ["scss", "scss/components"]
/// style = "compact"
/// sourcemap_url = "https://cdn.example.com/maps/"
///
/// [options]
/// auto_create_folders = false
/// auto_create_files = false
/// write_source_map = true
/// scan = "shallow"
///
/// [watch]
/// use_hash = false
/// ```
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectFile {
    pub build: BuildSection,

    #[serde(default)]
    pub options: OptionsSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated project file. Construct via `TryFrom<RawProjectFile>`.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub build: BuildSection,
    pub options: OptionsSection,
    pub watch: WatchSection,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(
        build: BuildSection,
        options: OptionsSection,
        watch: WatchSection,
    ) -> Self {
        Self {
            build,
            options,
            watch,
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// File that seeds compilation.
    pub entry: PathBuf,

    /// The single generated stylesheet.
    pub output: PathBuf,

    /// Source/import folders, in registration order.
    #[serde(default)]
    pub folders: Vec<PathBuf>,

    #[serde(default)]
    pub style: OutputStyle,

    /// Public URL prefix for the sourcemap. Setting it enables sourcemaps.
    #[serde(default)]
    pub sourcemap_url: Option<String>,
}

/// `[options]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsSection {
    #[serde(default)]
    pub auto_create_folders: bool,

    #[serde(default)]
    pub auto_create_files: bool,

    /// Write `<output>.map` to disk when a sourcemap URL is configured.
    ///
    /// When false the compiled CSS still references the URL, but no map file
    /// is produced.
    #[serde(default = "default_write_source_map")]
    pub write_source_map: bool,

    #[serde(default)]
    pub scan: ScanMode,
}

fn default_write_source_map() -> bool {
    true
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            auto_create_folders: false,
            auto_create_files: false,
            write_source_map: default_write_source_map(),
            scan: ScanMode::default(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WatchSection {
    /// Skip rebuilds when the content hash of all sources is unchanged.
    #[serde(default)]
    pub use_hash: bool,
}
