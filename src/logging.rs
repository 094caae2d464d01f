// src/logging.rs

//! Diagnostics for devloop itself.
//!
//! App output and status lines go through the event sink. What is set up
//! here is the `tracing` subscriber for internal diagnostics, written to
//! stderr and quiet (`warn`) unless asked for.
//!
//! `--log-level` wins over `DEVLOOP_LOG`. The environment variable takes
//! full `EnvFilter` directives, e.g. `DEVLOOP_LOG=devloop::watch=trace`.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable read when `--log-level` is not given.
pub const LOG_ENV: &str = "DEVLOOP_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }
    env.and_then(|directives| EnvFilter::try_new(directives.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
