mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use devloop::cli::CliArgs;
use devloop::config::{load_and_validate, load_settings, Settings};
use devloop::errors::DevloopError;
use devloop_test_utils::builders::RawConfigBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> Result<(tempfile::TempDir, PathBuf), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("devloop.toml");
    fs::write(&path, contents)?;
    Ok((dir, path))
}

#[test]
fn full_config_file_is_loaded() -> TestResult {
    init_tracing();
    let (dir, path) = write_config(
        r#"
build = "cargo build"
run = "./target/debug/server --port 8080"

[watch]
root = "src"
debounce = "300ms"
extensions = [".rs", "toml"]
ignore = ["target"]

[process]
stop_timeout = "2s"

[events]
queue_capacity = 32
"#,
    )?;

    let settings = load_and_validate(&path)?;

    assert_eq!(settings.build, "cargo build");
    assert_eq!(settings.run, "./target/debug/server --port 8080");
    assert_eq!(settings.root, dir.path().join("src"));
    assert_eq!(settings.debounce, Duration::from_millis(300));
    assert_eq!(settings.extensions, ["rs", "toml"]);
    assert_eq!(settings.ignore, ["target"]);
    assert_eq!(settings.stop_timeout, Duration::from_secs(2));
    assert_eq!(settings.queue_capacity, 32);

    let watch = settings.watch_options();
    assert_eq!(watch.debounce, Duration::from_millis(300));
    let sup = settings.supervisor_options();
    assert_eq!(sup.stop_timeout, Duration::from_secs(2));
    Ok(())
}

#[test]
fn cli_flags_override_the_config_file() -> TestResult {
    init_tracing();
    let (_dir, path) = write_config(
        r#"
build = "go build -o app"
run = "./app"

[watch]
debounce = "1s"
"#,
    )?;

    let args = CliArgs::try_parse_from([
        "devloop",
        "--config",
        path.to_str().ok_or("non-utf8 temp path")?,
        "--build",
        "",
        "--run",
        "python3 app.py",
        "--debounce",
        "200ms",
        "--ext",
        "py",
        "--ext",
        "html",
        "--dir",
        "/srv/app",
    ])?;
    let settings = load_settings(&args)?;

    assert_eq!(settings.build, "");
    assert_eq!(settings.run, "python3 app.py");
    assert_eq!(settings.debounce, Duration::from_millis(200));
    assert_eq!(settings.extensions, ["py", "html"]);
    assert_eq!(settings.root, PathBuf::from("/srv/app"));
    // Not overridden: still the default.
    assert_eq!(settings.ignore, [".git", "vendor"]);
    Ok(())
}

#[test]
fn missing_explicit_config_is_an_error() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.toml");

    let args = CliArgs::try_parse_from(["devloop", "--config", missing.to_str().ok_or("path")?])?;

    assert!(matches!(load_settings(&args), Err(DevloopError::IoError(_))));
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    init_tracing();
    let (_dir, path) = write_config(
        r#"
run = "./app"

[watch]
debounce_ms = 300
"#,
    )?;

    assert!(matches!(load_and_validate(&path), Err(DevloopError::TomlError(_))));
    Ok(())
}

#[test]
fn invalid_durations_name_the_offending_key() -> TestResult {
    init_tracing();
    let raw = RawConfigBuilder::new().stop_timeout("soon").build();

    match Settings::try_from(raw) {
        Err(DevloopError::ConfigError(msg)) => {
            assert!(msg.contains("process.stop_timeout"), "{msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn builder_settings_resolve_with_defaults() -> TestResult {
    init_tracing();
    let raw = RawConfigBuilder::new()
        .build_cmd("make")
        .run_cmd("./bin/app")
        .root("/tmp/project")
        .debounce("50ms")
        .extension("go")
        .extension("tmpl")
        .build();

    let settings = Settings::try_from(raw)?;

    assert_eq!(settings.build, "make");
    assert_eq!(settings.root, PathBuf::from("/tmp/project"));
    assert_eq!(settings.debounce, Duration::from_millis(50));
    assert_eq!(settings.extensions, ["go", "tmpl"]);
    assert_eq!(settings.stop_timeout, Duration::from_secs(5));
    Ok(())
}

#[test]
fn oversized_durations_are_config_errors() -> TestResult {
    init_tracing();
    for debounce in ["18446744073709551615h", "18446744073709551615s"] {
        let (_dir, path) = write_config(&format!("[watch]\ndebounce = \"{debounce}\"\n"))?;

        match load_and_validate(&path) {
            Err(DevloopError::ConfigError(msg)) => assert!(msg.contains("watch.debounce"), "{msg}"),
            other => panic!("expected ConfigError for {debounce}, got {other:?}"),
        }
    }
    Ok(())
}
