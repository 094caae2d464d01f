// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{DEFAULT_BUILD, DEFAULT_RUN, RawConfigFile, Settings};
use crate::errors::{DevloopError, Result};
use crate::events::DEFAULT_QUEUE_CAPACITY;
use crate::exec::DEFAULT_STOP_TIMEOUT;
use crate::watch::DEFAULT_DEBOUNCE;
use crate::watch::filter::{DEFAULT_EXTENSIONS, DEFAULT_IGNORED_SEGMENTS};

/// Upper bound for `watch.debounce` and `process.stop_timeout`.
pub const MAX_DURATION: Duration = Duration::from_secs(60 * 60);

impl TryFrom<RawConfigFile> for Settings {
    type Error = DevloopError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let build = raw.build.unwrap_or_else(|| DEFAULT_BUILD.to_string());
        let run = raw.run.unwrap_or_else(|| DEFAULT_RUN.to_string());
        if run.trim().is_empty() {
            return Err(DevloopError::ConfigError(
                "`run` must not be empty".to_string(),
            ));
        }

        let debounce = duration_or(raw.watch.debounce.as_deref(), "watch.debounce", DEFAULT_DEBOUNCE)?;
        if debounce.is_zero() {
            return Err(DevloopError::ConfigError(
                "[watch].debounce must be greater than zero".to_string(),
            ));
        }

        let stop_timeout = duration_or(
            raw.process.stop_timeout.as_deref(),
            "process.stop_timeout",
            DEFAULT_STOP_TIMEOUT,
        )?;

        let extensions = normalize_extensions(
            raw.watch
                .extensions
                .unwrap_or_else(|| to_strings(DEFAULT_EXTENSIONS)),
        );
        if extensions.is_empty() {
            return Err(DevloopError::ConfigError(
                "[watch].extensions must list at least one extension".to_string(),
            ));
        }

        let ignore = raw
            .watch
            .ignore
            .unwrap_or_else(|| to_strings(DEFAULT_IGNORED_SEGMENTS))
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let queue_capacity = raw.events.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY);
        if queue_capacity == 0 {
            return Err(DevloopError::ConfigError(
                "[events].queue_capacity must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(Settings {
            build: build.trim().to_string(),
            run: run.trim().to_string(),
            root: raw.watch.root.unwrap_or_else(|| PathBuf::from(".")),
            debounce,
            extensions,
            ignore,
            stop_timeout,
            queue_capacity,
        })
    }
}

fn duration_or(value: Option<&str>, key: &str, default: Duration) -> Result<Duration> {
    let Some(s) = value else {
        return Ok(default);
    };
    let duration = parse_duration(s)
        .map_err(|e| DevloopError::ConfigError(format!("invalid `{key}`: {e}")))?;
    if duration > MAX_DURATION {
        return Err(DevloopError::ConfigError(format!(
            "invalid `{key}`: {s} exceeds the maximum of {}s",
            MAX_DURATION.as_secs()
        )));
    }
    Ok(duration)
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.').to_string();
        if !ext.is_empty() && !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
