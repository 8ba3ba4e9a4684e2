// src/lib.rs

pub mod builder;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod sources;
pub mod types;
pub mod watch;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

pub use crate::builder::{BuildConfig, BuildOptions, Builder, CompiledStylesheet, Sourcemap};
pub use crate::errors::BuilderError;
pub use crate::types::{BuildOutcome, OutputStyle, ScanMode};

use crate::cli::CliArgs;
use crate::compiler::GrassCompiler;
use crate::config::{load_and_validate, project_root, ProjectFile};
use crate::fs::RealFileSystem;

/// Exit status used by `--check` when the output is stale.
pub const EXIT_STALE: i32 = 2;

/// High-level entry point used by `main.rs`.
///
/// Loads the project file, wires a `Builder` over the real filesystem and
/// the `grass` compiler, then runs the selected mode. Returns the process
/// exit status.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config_path = PathBuf::from(&args.config);
    let project = load_and_validate(&config_path)?;
    let root = project_root(&config_path);

    if args.dry_run {
        print_dry_run(&project, &root);
        return Ok(0);
    }

    let builder = Builder::from_project(
        &project,
        &root,
        Arc::new(RealFileSystem),
        Box::new(GrassCompiler::new().quiet(args.quiet_compiler())),
    )?;

    if args.check {
        let stale = builder.needs_rebuild()?;
        println!("{}", if stale { "needs rebuild" } else { "up to date" });
        return Ok(if stale { EXIT_STALE } else { 0 });
    }

    if args.print {
        let css = builder.compiled_code(args.force)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(css.as_bytes())?;
        stdout.flush()?;
        return Ok(0);
    }

    if args.watch {
        if args.force {
            builder.build(true)?;
        }
        watch::run_watch(builder, project.watch.use_hash).await?;
        return Ok(0);
    }

    match builder.build(args.force)? {
        BuildOutcome::Built => info!("build complete"),
        BuildOutcome::UpToDate => info!("nothing to do; output is up to date"),
    }
    Ok(0)
}

/// Simple dry-run output: print the resolved project.
fn print_dry_run(project: &ProjectFile, root: &Path) {
    println!("scss-builder dry-run");
    println!("  root = {}", root.display());
    println!("  entry = {}", config::resolve(root, &project.build.entry).display());
    println!("  output = {}", config::resolve(root, &project.build.output).display());
    println!("  style = {}", project.build.style);
    if let Some(url) = &project.build.sourcemap_url {
        println!("  sourcemap_url = {url}");
        println!("  write_source_map = {}", project.options.write_source_map);
    }
    println!();

    println!("folders ({}):", project.build.folders.len());
    for folder in project.build.folders.iter() {
        println!("  - {}", config::resolve(root, folder).display());
    }
    println!();

    println!("options:");
    println!("  auto_create_folders = {}", project.options.auto_create_folders);
    println!("  auto_create_files = {}", project.options.auto_create_files);
    println!("  scan = {:?}", project.options.scan);
    println!("  watch.use_hash = {}", project.watch.use_hash);

    debug!("dry-run complete (no build)");
}
