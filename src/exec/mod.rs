// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] splits command strings into program + arguments.
//! - [`supervisor`] owns the build step and the single running child.
//! - [`output`] streams child stdout/stderr lines into the event channel.
//! - [`signal`] delivers the graceful interrupt.
//! - [`backend`] provides the `SupervisorBackend` trait that the watcher and
//!   control surface drive, and which tests can replace with a fake.

pub mod backend;
pub mod command;
pub mod output;
pub mod signal;
pub mod supervisor;

pub use backend::{BackendFuture, RestartReason, SupervisorBackend};
pub use command::CommandLine;
pub use supervisor::{DEFAULT_STOP_TIMEOUT, ProcessSupervisor, SupervisorOptions};
