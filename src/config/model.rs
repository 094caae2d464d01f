// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::SupervisorOptions;
use crate::watch::WatchOptions;

/// Default build command.
pub const DEFAULT_BUILD: &str = "go build -o app";
/// Default run command.
pub const DEFAULT_RUN: &str = "./app";

/// Configuration as read from a TOML file.
///
/// ```toml
/// build = "go build -o app"
/// run = "./app"
///
/// [watch]
/// root = "."
/// debounce = "750ms"
/// extensions = ["go"]
/// ignore = [".git", "vendor"]
///
/// [process]
/// stop_timeout = "5s"
///
/// [events]
/// queue_capacity = 256
/// ```
///
/// Every key is optional; unset keys fall back to CLI flags and then to
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: Option<String>,

    #[serde(default)]
    pub run: Option<String>,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub process: ProcessSection,

    #[serde(default)]
    pub events: EventsSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    pub root: Option<PathBuf>,
    /// Quiet period, e.g. `"750ms"`.
    pub debounce: Option<String>,
    /// Source-file extensions that trigger a restart.
    pub extensions: Option<Vec<String>>,
    /// Directory segments that are never watched.
    pub ignore: Option<Vec<String>>,
}

/// `[process]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSection {
    /// How long to wait after the interrupt before force-killing.
    pub stop_timeout: Option<String>,
}

/// `[events]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsSection {
    pub queue_capacity: Option<usize>,
}

/// Fully resolved, validated settings.
///
/// Built from a [`RawConfigFile`] via `TryFrom` (see
/// [`validate`](crate::config::validate)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub build: String,
    pub run: String,
    pub root: PathBuf,
    pub debounce: Duration,
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
    pub stop_timeout: Duration,
    pub queue_capacity: usize,
}

impl Settings {
    pub fn supervisor_options(&self) -> SupervisorOptions {
        SupervisorOptions {
            build: self.build.clone(),
            run: self.run.clone(),
            stop_timeout: self.stop_timeout,
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            root: self.root.clone(),
            debounce: self.debounce,
            extensions: self.extensions.clone(),
            ignored_segments: self.ignore.clone(),
        }
    }
}
