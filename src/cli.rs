// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `scss-builder`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scss-builder",
    version,
    about = "Rebuild a stylesheet from SCSS sources when they change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Relative paths inside it are resolved against its directory.
    #[arg(long, value_name = "PATH", default_value = "ScssBuilder.toml")]
    pub config: String,

    /// Rebuild even if the output is up to date.
    #[arg(long)]
    pub force: bool,

    /// Only report whether a rebuild is needed (exit status 2 if so).
    #[arg(long, conflicts_with_all = ["print", "watch", "dry_run"])]
    pub check: bool,

    /// Print the compiled stylesheet to stdout instead of writing it.
    ///
    /// Reads the existing output when it is fresh.
    #[arg(long, conflicts_with_all = ["watch", "dry_run"])]
    pub print: bool,

    /// Keep running and rebuild whenever a source changes.
    #[arg(long, conflicts_with = "dry_run")]
    pub watch: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCSS_BUILDER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the project file, print it, but don't build.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// `--log-level error` also silences `@warn` / `@debug` from the compiler.
    pub fn quiet_compiler(&self) -> bool {
        matches!(self.log_level, Some(LogLevel::Error))
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
