// src/config/validate.rs

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::{BuilderError, Result};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = crate::errors::BuilderError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        Ok(ProjectFile::new_unchecked(raw.build, raw.options, raw.watch))
    }
}

/// Semantic checks that serde cannot express.
///
/// Filesystem state is not checked here; the builder does that when the
/// paths are registered.
fn validate_raw_project(cfg: &RawProjectFile) -> Result<()> {
    ensure_has_folders(cfg)?;
    validate_paths(cfg)?;
    validate_sourcemap_url(cfg)?;
    Ok(())
}

fn ensure_has_folders(cfg: &RawProjectFile) -> Result<()> {
    if cfg.build.folders.is_empty() {
        return Err(BuilderError::ProjectFile(
            "[build].folders must list at least one source folder".to_string(),
        ));
    }
    Ok(())
}

fn validate_paths(cfg: &RawProjectFile) -> Result<()> {
    if cfg.build.entry.as_os_str().is_empty() {
        return Err(BuilderError::ProjectFile(
            "[build].entry must not be empty".to_string(),
        ));
    }
    if cfg.build.output.as_os_str().is_empty() || cfg.build.output.file_name().is_none() {
        return Err(BuilderError::ProjectFile(format!(
            "[build].output must name a file (got {:?})",
            cfg.build.output
        )));
    }
    for folder in cfg.build.folders.iter() {
        if folder.as_os_str().is_empty() {
            return Err(BuilderError::ProjectFile(
                "[build].folders must not contain empty paths".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_sourcemap_url(cfg: &RawProjectFile) -> Result<()> {
    if let Some(url) = &cfg.build.sourcemap_url {
        if url.trim().is_empty() {
            return Err(BuilderError::ProjectFile(
                "[build].sourcemap_url must not be blank; omit it to disable sourcemaps"
                    .to_string(),
            ));
        }
    }
    Ok(())
}
