// src/errors.rs

//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevloopError {
    /// The build command exited non-zero or could not be launched.
    #[error("build command `{command}` failed: {reason}")]
    BuildFailed { command: String, reason: String },

    /// The run command could not be launched.
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The graceful interrupt was rejected. Never returned from `stop`; the
    /// supervisor escalates to a kill instead.
    #[error("failed to signal process: {0}")]
    SignalFailed(String),

    #[error("failed to set up file watcher: {0}")]
    WatchSetupFailed(#[source] notify::Error),

    #[error("failed to watch directory {dir:?}: {source}")]
    DirectoryRegistrationFailed {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("command is empty: {0:?}")]
    EmptyCommand(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevloopError>;
