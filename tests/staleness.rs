use std::error::Error;
use std::path::{Path, PathBuf};

use scss_builder::fs::FileSystem;
use scss_builder::{BuilderError, ScanMode};
use scss_builder_test_utils::builders::{Fixture, OUTPUT};
use scss_builder_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_output_is_always_stale() -> TestResult {
    init_tracing();
    let fx = Fixture::new();
    let builder = fx.builder();

    assert!(!fx.fs.exists(Path::new(OUTPUT)));
    assert!(builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn output_newer_than_every_source_is_fresh() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();

    fx.fs.add_file(OUTPUT, "compiled");
    assert!(!builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn touching_a_partial_flips_staleness() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    fx.fs.add_file(OUTPUT, "compiled");
    assert!(!builder.needs_rebuild()?);

    // Not the entry file: any recognized source in a registered folder counts.
    fx.fs.touch("/src/_vars.scss");
    assert!(builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn plain_css_sources_count_too() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    fx.fs.add_file(OUTPUT, "compiled");

    fx.fs.add_file("/src/reset.css", "*{margin:0}");
    assert!(builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn unrecognized_extensions_are_ignored() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    fx.fs.add_file(OUTPUT, "compiled");

    fx.fs.add_file("/src/notes.md", "todo");
    fx.fs.add_file("/src/main.scss.orig", "old");
    fx.fs.add_file("/src/theme.sass", "a\n  b: c");
    assert!(!builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn nested_folders_do_not_affect_shallow_scan() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    fx.fs.add_file(OUTPUT, "compiled");

    fx.fs.add_file("/src/components/_button.scss", ".btn{}");
    fx.fs.touch("/src/components");
    assert!(!builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn recursive_scan_sees_nested_sources() -> TestResult {
    let fx = Fixture::new();
    let mut builder = fx.builder();
    builder.set_scan_mode(ScanMode::Recursive);
    fx.fs.add_file(OUTPUT, "compiled");
    assert!(!builder.needs_rebuild()?);

    fx.fs.add_file("/src/components/_button.scss", ".btn{}");
    assert!(builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn equal_mtime_is_not_stale() -> TestResult {
    // The comparison is strictly-greater; use a real tempdir and pin times.
    let dir = tempfile::tempdir()?;
    let src = dir.path().join("src");
    std::fs::create_dir(&src)?;
    let entry = src.join("main.scss");
    let output = dir.path().join("style.css");
    std::fs::write(&entry, "a{}")?;
    std::fs::write(&output, "a{}")?;

    let stamp = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000);
    std::fs::File::options().write(true).open(&entry)?.set_modified(stamp)?;
    std::fs::File::options().write(true).open(&output)?.set_modified(stamp)?;

    let mut builder = scss_builder::Builder::default();
    builder.add_folder(&src)?;
    builder.set_output_file(&output)?;
    builder.set_entry_file(&entry)?;

    assert!(!builder.needs_rebuild()?);

    let later = stamp + std::time::Duration::from_secs(5);
    std::fs::File::options().write(true).open(&entry)?.set_modified(later)?;
    assert!(builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn vanished_folder_is_an_io_error() -> TestResult {
    let fx = Fixture::new();
    fx.fs.add_dir("/extra");
    let mut builder = fx.builder();
    builder.add_folder("/extra")?;
    fx.fs.add_file(OUTPUT, "compiled");

    fx.fs.remove("/extra");
    match builder.needs_rebuild() {
        Err(BuilderError::Io { path, .. }) => assert_eq!(path, PathBuf::from("/extra")),
        other => panic!("expected Io error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unreadable_folder_is_an_io_error() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    fx.fs.add_file(OUTPUT, "compiled");

    fx.fs.deny_read("/src");
    assert!(matches!(builder.needs_rebuild(), Err(BuilderError::Io { .. })));
    Ok(())
}

#[test]
fn missing_output_short_circuits_before_folder_checks() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    fx.fs.deny_read("/src");

    assert!(builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn staleness_in_a_later_folder_is_found() -> TestResult {
    let fx = Fixture::new();
    fx.fs.add_file("/lib/_mixins.scss", "@mixin m{}");
    let mut builder = fx.builder();
    builder.add_folder("/lib")?;
    fx.fs.add_file(OUTPUT, "compiled");
    assert!(!builder.needs_rebuild()?);

    fx.fs.touch("/lib/_mixins.scss");
    assert!(builder.needs_rebuild()?);
    assert!(fx.fs.modified(Path::new("/lib/_mixins.scss"))? > fx.fs.modified(Path::new(OUTPUT))?);
    Ok(())
}
