// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::errors::Result;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "devloop.toml";

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** apply defaults or
/// validate anything. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file, apply defaults and validate it.
///
/// A relative `[watch].root` is resolved against the directory holding the
/// config file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = load_file(path.as_ref())?;
    Settings::try_from(raw)
}

/// Resolve the effective settings for a CLI invocation.
///
/// Precedence: CLI flags, then the config file (`--config`, or
/// `devloop.toml` in the working directory if present), then defaults.
/// An explicit `--config` path that does not exist is an error.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let raw = match &args.config {
        Some(path) => load_file(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                load_file(default)?
            } else {
                debug!("no {DEFAULT_CONFIG_FILE} found; using defaults");
                RawConfigFile::default()
            }
        }
    };

    Settings::try_from(apply_cli_overrides(raw, args))
}

/// Overlay any flags given on the command line onto `raw`.
pub fn apply_cli_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if let Some(build) = &args.build {
        raw.build = Some(build.clone());
    }
    if let Some(run) = &args.run {
        raw.run = Some(run.clone());
    }
    if let Some(dir) = &args.dir {
        raw.watch.root = Some(dir.clone());
    }
    if let Some(debounce) = &args.debounce {
        raw.watch.debounce = Some(debounce.clone());
    }
    if !args.extensions.is_empty() {
        raw.watch.extensions = Some(args.extensions.clone());
    }
    if !args.ignore.is_empty() {
        raw.watch.ignore = Some(args.ignore.clone());
    }
    if let Some(timeout) = &args.stop_timeout {
        raw.process.stop_timeout = Some(timeout.clone());
    }
    raw
}

fn load_file(path: &Path) -> Result<RawConfigFile> {
    debug!(?path, "loading config file");
    let mut raw = load_from_path(path)?;
    if let Some(root) = raw.watch.root.take() {
        raw.watch.root = Some(resolve_against_config_dir(path, root));
    }
    Ok(raw)
}

/// - If the config path has a non-empty parent (e.g. "configs/devloop.toml"),
///   relative roots are taken from that directory.
/// - If it's just a bare filename, they stay relative to the working
///   directory.
fn resolve_against_config_dir(config_path: &Path, root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        return root;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(root),
        _ => root,
    }
}
