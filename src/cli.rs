// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `devloop`.
///
/// Every flag that mirrors a config key overrides the value from the config
/// file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devloop",
    version,
    about = "Build, run and restart a project whenever its sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// Default: `devloop.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Build command, split on whitespace (no shell quoting).
    #[arg(long, value_name = "CMD")]
    pub build: Option<String>,

    /// Run command, split on whitespace (no shell quoting).
    #[arg(long, value_name = "CMD")]
    pub run: Option<String>,

    /// Quiet period before restarting, e.g. `750ms` or `1s`.
    #[arg(long, value_name = "DURATION")]
    pub debounce: Option<String>,

    /// Source-file extension that triggers a restart. Repeatable.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Directory name that is never watched. Repeatable.
    #[arg(long = "ignore", value_name = "SEGMENT")]
    pub ignore: Vec<String>,

    /// Grace period after the interrupt before the app is killed.
    #[arg(long, value_name = "DURATION")]
    pub stop_timeout: Option<String>,

    /// Prefix output lines with the time they were received.
    #[arg(long)]
    pub timestamps: bool,

    /// Do not read restart commands from stdin.
    #[arg(long)]
    pub no_stdin: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVLOOP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't build or run anything.
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
