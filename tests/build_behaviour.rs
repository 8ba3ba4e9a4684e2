use std::error::Error;
use std::path::{Path, PathBuf};

use scss_builder::fs::FileSystem;
use scss_builder::{BuildOutcome, BuilderError, OutputStyle};
use scss_builder_test_utils::builders::{Fixture, ENTRY, MAP, OUTPUT};
use scss_builder_test_utils::fake_compiler::FakeCompiler;

type TestResult = Result<(), Box<dyn Error>>;

fn output_text(fx: &Fixture) -> String {
    String::from_utf8(fx.fs.contents(OUTPUT).expect("output written")).unwrap()
}

#[test]
fn first_build_writes_compact_output_and_becomes_fresh() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();

    assert!(builder.needs_rebuild()?);
    assert_eq!(builder.build(false)?, BuildOutcome::Built);

    assert_eq!(
        output_text(&fx),
        FakeCompiler::render("body{color:red;}", OutputStyle::Compact)
    );
    assert!(!builder.needs_rebuild()?);
    Ok(())
}

#[test]
fn compiler_receives_folders_in_registration_order() -> TestResult {
    let fx = Fixture::new();
    fx.fs.add_dir("/vendor");
    let mut builder = fx.empty_builder();
    builder.add_folder("/vendor")?;
    builder.add_folder("/src")?;
    builder.set_output_file(OUTPUT)?;
    builder.set_entry_file(ENTRY)?;
    builder.set_output_expanded(true);

    builder.build(false)?;

    let calls = fx.compiler.calls();
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].import_paths,
        vec![PathBuf::from("/vendor"), PathBuf::from("/src")]
    );
    assert_eq!(calls[0].style, OutputStyle::Expanded);
    assert_eq!(calls[0].source, "body{color:red;}");
    assert!(calls[0].sourcemap.is_none());
    Ok(())
}

#[test]
fn fresh_build_leaves_output_untouched() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    builder.build(false)?;

    let before_bytes = fx.fs.contents(OUTPUT);
    let before_mtime = fx.fs.modified(Path::new(OUTPUT))?;

    assert_eq!(builder.build(false)?, BuildOutcome::UpToDate);

    assert_eq!(fx.fs.contents(OUTPUT), before_bytes);
    assert_eq!(fx.fs.modified(Path::new(OUTPUT))?, before_mtime);
    assert_eq!(fx.compiler.call_count(), 1);
    Ok(())
}

#[test]
fn forced_build_always_rewrites() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    builder.build(false)?;
    let before_mtime = fx.fs.modified(Path::new(OUTPUT))?;

    assert_eq!(builder.build(true)?, BuildOutcome::Built);

    assert!(fx.fs.modified(Path::new(OUTPUT))? > before_mtime);
    assert_eq!(fx.compiler.call_count(), 2);
    Ok(())
}

#[test]
fn compiled_code_matches_file_when_fresh() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    builder.build(false)?;

    // Hand-edit the output so a recompile would be distinguishable.
    fx.fs.add_file(OUTPUT, "hand-edited");
    assert!(!builder.needs_rebuild()?);

    assert_eq!(builder.compiled_code(false)?, "hand-edited");
    assert_eq!(fx.compiler.call_count(), 1);
    Ok(())
}

#[test]
fn compiled_code_recompiles_when_stale_without_persisting() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    builder.build(false)?;
    let persisted = output_text(&fx);

    fx.fs.add_file(ENTRY, "body{color:blue;}");
    let code = builder.compiled_code(false)?;

    assert_eq!(code, FakeCompiler::render("body{color:blue;}", OutputStyle::Compact));
    assert_ne!(code, persisted);
    assert_eq!(output_text(&fx), persisted);
    Ok(())
}

#[test]
fn compiled_code_forced_recompiles_even_when_fresh() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    builder.build(false)?;
    fx.fs.add_file(OUTPUT, "hand-edited");

    let code = builder.compiled_code(true)?;
    assert_eq!(code, FakeCompiler::render("body{color:red;}", OutputStyle::Compact));
    assert_eq!(output_text(&fx), "hand-edited");
    Ok(())
}

#[test]
fn sourcemap_is_written_and_referenced() -> TestResult {
    let fx = Fixture::new();
    let mut builder = fx.builder();
    builder.set_sourcemap_base_url("https://cdn.example.com/maps/");

    builder.build(false)?;

    assert!(fx.fs.exists(Path::new(MAP)));
    assert!(output_text(&fx)
        .contains("sourceMappingURL=https://cdn.example.com/maps/style.css.map"));

    let calls = fx.compiler.calls();
    let recorded = calls.lock().unwrap()[0].sourcemap.clone().unwrap();
    assert_eq!(recorded.write_to, PathBuf::from(MAP));
    assert_eq!(recorded.url, "https://cdn.example.com/maps/style.css.map");
    Ok(())
}

#[test]
fn disabled_map_writing_still_references_url() -> TestResult {
    let fx = Fixture::new();
    let mut builder = fx.builder();
    builder.set_sourcemap_base_url("https://cdn.example.com/maps/");
    builder.set_write_source_map(false);

    builder.build(false)?;

    assert!(!fx.fs.exists(Path::new(MAP)));
    assert!(output_text(&fx)
        .contains("sourceMappingURL=https://cdn.example.com/maps/style.css.map"));
    Ok(())
}

#[test]
fn setting_sourcemap_url_writes_nothing_by_itself() -> TestResult {
    let fx = Fixture::new();
    let mut builder = fx.builder();
    builder.set_sourcemap_base_url("/maps/");

    assert!(!fx.fs.exists(Path::new(MAP)));
    assert!(!fx.fs.exists(Path::new(OUTPUT)));
    assert_eq!(fx.compiler.call_count(), 0);
    Ok(())
}

#[test]
fn compile_failure_keeps_previous_output() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();
    builder.build(false)?;
    let previous = output_text(&fx);

    fx.fs.add_file(ENTRY, "body{ !fail }");
    match builder.build(false) {
        Err(BuilderError::Compile { entry, message }) => {
            assert_eq!(entry, PathBuf::from(ENTRY));
            assert!(message.contains("fake syntax error"));
        }
        other => panic!("expected Compile error, got {other:?}"),
    }
    assert_eq!(output_text(&fx), previous);
    Ok(())
}

#[test]
fn failed_sourcemap_write_keeps_previous_output() -> TestResult {
    let fx = Fixture::new();
    let mut builder = fx.builder();
    builder.build(false)?;
    let previous = output_text(&fx);

    builder.set_sourcemap_base_url("https://cdn.example.com/maps/");
    fx.fs.add_dir(MAP);
    fx.fs.add_file(ENTRY, "body{color:blue;}");

    match builder.build(false) {
        Err(BuilderError::Io { path, .. }) => assert_eq!(path, PathBuf::from(MAP)),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert_eq!(output_text(&fx), previous);
    Ok(())
}

#[test]
fn entry_removed_after_setup_is_an_io_error() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();

    fx.fs.remove(ENTRY);
    match builder.compile_once() {
        Err(BuilderError::Io { path, .. }) => assert_eq!(path, PathBuf::from(ENTRY)),
        other => panic!("expected Io error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn every_compile_rereads_the_entry() -> TestResult {
    let fx = Fixture::new();
    let builder = fx.builder();

    let first = builder.compile_once()?;
    fx.fs.add_file(ENTRY, "a{}");
    let second = builder.compile_once()?;

    assert_ne!(first.css, second.css);
    assert_eq!(second.css, FakeCompiler::render("a{}", OutputStyle::Compact));
    Ok(())
}
