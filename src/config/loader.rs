// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::{BuilderError, Result};

/// Load a project file from a given path and return the raw `RawProjectFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| BuilderError::io(path, e))?;

    let config: RawProjectFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a project file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that folders are listed and that entry/output/URL are sane.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(&path)?;
    let config = ProjectFile::try_from(raw)?;
    Ok(config)
}

/// Directory that relative paths in the project file are resolved against.
///
/// A bare file name like `ScssBuilder.toml` has an empty parent; that means
/// the current directory.
pub fn project_root(config_path: &Path) -> PathBuf {
    crate::fs::parent_dir(config_path)
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let file = write_config(
            r#"
[build]
entry = "scss/main.scss"
output = "public/style.css"
folders = ["scss"]
"#,
        );
        let cfg = load_and_validate(file.path()).unwrap();
        assert_eq!(cfg.build.style, crate::types::OutputStyle::Compact);
        assert!(cfg.build.sourcemap_url.is_none());
        assert!(cfg.options.write_source_map);
        assert!(!cfg.options.auto_create_folders);
        assert_eq!(cfg.options.scan, crate::types::ScanMode::Shallow);
        assert!(!cfg.watch.use_hash);
    }

    #[test]
    fn unknown_style_is_a_toml_error() {
        let file = write_config(
            r#"
[build]
entry = "main.scss"
output = "style.css"
folders = ["."]
style = "pretty"
"#,
        );
        assert!(matches!(
            load_and_validate(file.path()),
            Err(BuilderError::TomlError(_))
        ));
    }

    #[test]
    fn empty_folder_list_is_rejected() {
        let file = write_config(
            r#"
[build]
entry = "main.scss"
output = "style.css"
"#,
        );
        match load_and_validate(file.path()) {
            Err(BuilderError::ProjectFile(msg)) => assert!(msg.contains("folders")),
            other => panic!("expected ProjectFile error, got {other:?}"),
        }
    }

    #[test]
    fn blank_sourcemap_url_is_rejected() {
        let file = write_config(
            r#"
[build]
entry = "main.scss"
output = "style.css"
folders = ["."]
sourcemap_url = "  "
"#,
        );
        assert!(matches!(
            load_and_validate(file.path()),
            Err(BuilderError::ProjectFile(_))
        ));
    }

    #[test]
    fn relative_paths_resolve_against_project_root() {
        let root = project_root(Path::new("site/ScssBuilder.toml"));
        assert_eq!(root, PathBuf::from("site"));
        assert_eq!(
            resolve(&root, Path::new("scss/main.scss")),
            PathBuf::from("site/scss/main.scss")
        );
        assert_eq!(project_root(Path::new("ScssBuilder.toml")), PathBuf::from("."));
    }
}
