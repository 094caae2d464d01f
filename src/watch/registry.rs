// src/watch/registry.rs

//! Directory registration with the notification backend.
//!
//! Every directory of the tree is registered individually and
//! non-recursively, so ignored subtrees (`.git`, `vendor`) never generate
//! events in the first place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::errors::DevloopError;
use crate::events::EventSender;
use crate::fs::FileSystem;
use crate::watch::filter::ChangeFilter;

/// Something that can start watching a single directory.
pub trait DirectoryRegistrar: Send {
    fn register(&mut self, dir: &Path) -> Result<()>;
}

/// Registrar backed by a live `notify` watcher.
///
/// Owning the watcher here keeps it alive for as long as the event loop
/// runs. Dropping this stops file watching.
pub struct NotifyRegistrar {
    inner: RecommendedWatcher,
}

impl NotifyRegistrar {
    pub fn new(inner: RecommendedWatcher) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for NotifyRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyRegistrar").finish()
    }
}

impl DirectoryRegistrar for NotifyRegistrar {
    fn register(&mut self, dir: &Path) -> Result<()> {
        self.inner.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }
}

/// Outcome of a [`register_tree`] walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeWalk {
    /// Directories newly registered.
    pub added: usize,
    /// Source files seen in the directories that were read.
    pub source_files: usize,
}

/// Register `start` and every directory below it, skipping ignored ones.
///
/// Best-effort: a directory that cannot be registered or read is logged
/// and skipped, and the rest of the tree is still walked. Directories
/// already in `registered` are neither registered nor read again.
pub fn register_tree(
    fs: &dyn FileSystem,
    registrar: &mut dyn DirectoryRegistrar,
    root: &Path,
    start: &Path,
    filter: &ChangeFilter,
    registered: &mut HashSet<PathBuf>,
    events: &EventSender,
) -> TreeWalk {
    let mut walk = TreeWalk::default();
    let mut pending = vec![start.to_path_buf()];

    while let Some(dir) = pending.pop() {
        if filter.is_ignored(root, &dir) {
            debug!(?dir, "skipping ignored directory");
            continue;
        }
        if registered.contains(&dir) {
            continue;
        }

        match registrar.register(&dir) {
            Ok(()) => {
                debug!(?dir, "watching directory");
                registered.insert(dir.clone());
                walk.added += 1;
            }
            Err(source) => {
                events.error(format!("Failed to watch {}: {source}", dir.display()));
                let err = DevloopError::DirectoryRegistrationFailed {
                    dir: dir.clone(),
                    source,
                };
                warn!(error = %err, "directory registration failed; skipping");
            }
        }

        // Keep descending even if this directory could not be registered.
        match fs.read_dir(&dir) {
            Ok(entries) => {
                let (mut subdirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
                    entries.into_iter().partition(|p| fs.is_dir(p));
                walk.source_files += files.iter().filter(|p| filter.is_source_file(p)).count();
                // Reverse-sorted so the stack pops in lexical order.
                subdirs.sort_by(|a, b| b.cmp(a));
                pending.extend(subdirs);
            }
            Err(err) => {
                warn!(?dir, error = %err, "could not read directory");
                events.error(format!("Failed to read {}: {err}", dir.display()));
            }
        }
    }

    walk
}
