// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{DevloopError, Result};
use crate::events::EventSender;
use crate::exec::SupervisorBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::debounce::{DEFAULT_DEBOUNCE, DebounceTimer, spawn_restart_on_settle};
use crate::watch::filter::{ChangeFilter, DEFAULT_EXTENSIONS, DEFAULT_IGNORED_SEGMENTS};
use crate::watch::registry::{DirectoryRegistrar, NotifyRegistrar, TreeWalk, register_tree};

/// Everything the watcher needs to know about what to watch.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub root: PathBuf,
    pub debounce: Duration,
    pub extensions: Vec<String>,
    pub ignored_segments: Vec<String>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            debounce: DEFAULT_DEBOUNCE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignored_segments: DEFAULT_IGNORED_SEGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl WatchOptions {
    pub fn filter(&self) -> ChangeFilter {
        ChangeFilter::new(&self.extensions, &self.ignored_segments)
    }
}

/// Aborts the wrapped task when dropped, so the restart task does not
/// outlive the event loop that feeds it.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Start the app, register the tree and restart on every settled burst of
/// source changes.
///
/// The initial start may fail (e.g. the project does not build yet); that is
/// logged and the watcher keeps going, so the next change retries. Only a
/// failure to create the notification backend ends this function early.
/// Otherwise it runs until the surrounding task is cancelled.
pub async fn watch_and_run<B>(
    options: WatchOptions,
    backend: Arc<B>,
    events: EventSender,
) -> Result<()>
where
    B: SupervisorBackend + ?Sized + 'static,
{
    if let Err(err) = backend.start().await {
        events.error(format!("Initial start failed: {err}"));
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    // Called synchronously on notify's own thread.
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if event_tx.send(res).is_err() {
                debug!("watch event loop gone; dropping notify event");
            }
        },
        Config::default(),
    );
    let watcher = match watcher {
        Ok(watcher) => watcher,
        Err(err) => {
            events.error(format!("Failed to create watcher: {err}"));
            return Err(DevloopError::WatchSetupFailed(err));
        }
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let root = fs
        .canonicalize(&options.root)
        .unwrap_or_else(|_| options.root.clone());

    let timer = DebounceTimer::new(options.debounce);
    let _restarts = AbortOnDrop(spawn_restart_on_settle(Arc::clone(&timer), backend));

    let mut change_loop = ChangeLoop::new(
        root,
        options.filter(),
        timer,
        Box::new(NotifyRegistrar::new(watcher)),
        fs,
        events.clone(),
    );
    change_loop.register_root();
    events.info(format!("Watching directory: {}", options.root.display()));

    change_loop.run(event_rx).await;
    Ok(())
}

/// The watch event loop: filters raw notify events, keeps newly created
/// directories registered, and arms the debounce timer.
pub struct ChangeLoop {
    root: PathBuf,
    filter: ChangeFilter,
    timer: Arc<DebounceTimer>,
    registrar: Box<dyn DirectoryRegistrar>,
    fs: Arc<dyn FileSystem>,
    registered: HashSet<PathBuf>,
    events: EventSender,
}

impl std::fmt::Debug for ChangeLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeLoop")
            .field("root", &self.root)
            .field("filter", &self.filter)
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}

impl ChangeLoop {
    pub fn new(
        root: PathBuf,
        filter: ChangeFilter,
        timer: Arc<DebounceTimer>,
        registrar: Box<dyn DirectoryRegistrar>,
        fs: Arc<dyn FileSystem>,
        events: EventSender,
    ) -> Self {
        Self {
            root,
            filter,
            timer,
            registrar,
            fs,
            registered: HashSet::new(),
            events,
        }
    }

    /// Register the whole tree below the root. Returns how many directories
    /// were registered.
    pub fn register_root(&mut self) -> usize {
        let root = self.root.clone();
        let walk = self.register_from(&root);
        info!(root = ?self.root, dirs = walk.added, "file watcher started");
        walk.added
    }

    /// Directories currently registered.
    pub fn registered(&self) -> &HashSet<PathBuf> {
        &self.registered
    }

    /// Consume events until the channel closes.
    pub async fn run(&mut self, mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>) {
        while let Some(res) = rx.recv().await {
            match res {
                Ok(event) => self.handle_event(event),
                Err(err) => {
                    warn!(error = %err, "file watch error");
                    self.events.error(format!("Watcher error: {err}"));
                }
            }
        }
        debug!("watch event loop finished");
    }

    pub fn handle_event(&mut self, event: Event) {
        if !ChangeFilter::is_change_kind(&event.kind) {
            return;
        }
        debug!(?event, "received notify event");

        for path in &event.paths {
            if self.filter.is_ignored(&self.root, path) {
                continue;
            }

            if matches!(event.kind, EventKind::Remove(_)) {
                // Forget removed directories so they are re-registered if
                // they come back.
                self.registered.retain(|dir| !dir.starts_with(path));
            }

            if matches!(event.kind, EventKind::Create(_)) && self.fs.is_dir(path) {
                let walk = self.register_from(path);
                debug!(?path, added = walk.added, sources = walk.source_files, "registered new directory");
                // Files moved or copied in with the directory produce no
                // events of their own.
                if walk.source_files > 0 {
                    self.events
                        .info(format!("Change detected: {}", path.display()));
                    self.timer.arm();
                }
                continue;
            }

            if self.filter.is_source_file(path) {
                self.events
                    .info(format!("Change detected: {}", path.display()));
                self.timer.arm();
            }
        }
    }

    fn register_from(&mut self, start: &Path) -> TreeWalk {
        register_tree(
            self.fs.as_ref(),
            self.registrar.as_mut(),
            &self.root,
            start,
            &self.filter,
            &mut self.registered,
            &self.events,
        )
    }
}
