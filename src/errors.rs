// src/errors.rs

//! Crate-wide error type.
//!
//! The core never catches or retries: every variant carries the path that
//! caused it so callers can act on it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    /// A folder, output directory or entry file is invalid and auto-creation
    /// could not (or was not allowed to) fix it.
    #[error("Configuration error at {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// A registered path disappeared or could not be read/written at use time.
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stylesheet compiler rejected the entry file.
    #[error("Compile error in {entry:?}: {message}")]
    Compile { entry: PathBuf, message: String },

    #[error("Project file error: {0}")]
    ProjectFile(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuilderError {
    pub(crate) fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BuilderError::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuilderError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuilderError>;
