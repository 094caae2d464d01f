// src/exec/backend.rs

//! Pluggable supervisor abstraction.
//!
//! The watcher and the stdin control surface talk to a `SupervisorBackend`
//! instead of a concrete [`ProcessSupervisor`]. Tests can swap in a fake that
//! records restarts without spawning real processes.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::supervisor::ProcessSupervisor;

/// Why a restart sequence was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// The debounce window settled after source changes.
    FileChange,
    /// Requested explicitly (e.g. `r` on stdin).
    Manual,
}

impl RestartReason {
    pub(crate) fn announcement(self) -> &'static str {
        match self {
            RestartReason::FileChange => "Changes detected, restarting...",
            RestartReason::Manual => "Manual restart triggered",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            RestartReason::FileChange => "Restart",
            RestartReason::Manual => "Manual restart",
        }
    }
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartReason::FileChange => f.write_str("file change"),
            RestartReason::Manual => f.write_str("manual"),
        }
    }
}

/// Boxed future returned by [`SupervisorBackend`] methods.
pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Trait abstracting the process control surface.
///
/// Production code uses [`ProcessSupervisor`].
pub trait SupervisorBackend: Send + Sync {
    /// Build and launch the app.
    fn start(&self) -> BackendFuture<'_>;

    /// Run a full single-flight stop + start sequence.
    fn restart(&self, reason: RestartReason) -> BackendFuture<'_>;
}

impl SupervisorBackend for ProcessSupervisor {
    fn start(&self) -> BackendFuture<'_> {
        Box::pin(ProcessSupervisor::start(self))
    }

    fn restart(&self, reason: RestartReason) -> BackendFuture<'_> {
        Box::pin(ProcessSupervisor::restart(self, reason))
    }
}
