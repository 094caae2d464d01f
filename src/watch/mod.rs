// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Registering every non-ignored directory of the tree with `notify`.
//! - Filtering raw events down to source-file changes.
//! - Debouncing bursts of changes into a single restart.
//!
//! It does **not** know how processes are built or run; it only drives a
//! [`SupervisorBackend`](crate::exec::SupervisorBackend).

pub mod debounce;
pub mod filter;
pub mod path_utils;
pub mod registry;
pub mod watcher;

pub use debounce::{DEFAULT_DEBOUNCE, DebounceTimer, spawn_restart_on_settle};
pub use filter::ChangeFilter;
pub use registry::{DirectoryRegistrar, NotifyRegistrar, TreeWalk, register_tree};
pub use watcher::{ChangeLoop, WatchOptions, watch_and_run};
