// src/exec/supervisor.rs

//! The process supervisor: build, spawn, stop and restart exactly one app
//! process.
//!
//! All state lives in [`ProcessSupervisor`]; there is no global runner. Two
//! locks are involved:
//!
//! - `state` guards the child handle and is held for the whole of `start`
//!   and `stop`, so the two never interleave.
//! - `restart_gate` makes whole stop + start sequences single-flight, so a
//!   manual restart and a debounce-triggered restart cannot overlap.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{DevloopError, Result};
use crate::events::{BuildStatus, EventSender};

use super::backend::RestartReason;
use super::command::CommandLine;
use super::output::spawn_line_reader;
use super::signal;

/// How long `stop` waits after the interrupt before force-killing.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Build command. Empty means "no build step".
    pub build: String,
    /// Run command. Must not be empty.
    pub run: String,
    pub stop_timeout: Duration,
}

impl SupervisorOptions {
    pub fn new(build: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            build: build.into(),
            run: run.into(),
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

/// A spawned app process plus its output readers.
#[derive(Debug)]
struct RunningChild {
    child: Child,
    pid: Option<u32>,
    // Detached on stop; they end on their own once the pipes close.
    _readers: Vec<JoinHandle<()>>,
}

#[derive(Debug, Default)]
struct SupervisorState {
    child: Option<RunningChild>,
}

#[derive(Debug)]
pub struct ProcessSupervisor {
    build: Option<CommandLine>,
    run: CommandLine,
    stop_timeout: Duration,
    state: Mutex<SupervisorState>,
    restart_gate: Mutex<()>,
    spawn_count: AtomicU64,
    events: EventSender,
}

impl ProcessSupervisor {
    pub fn new(options: SupervisorOptions, events: EventSender) -> Result<Self> {
        let build = if options.build.trim().is_empty() {
            None
        } else {
            Some(CommandLine::parse(&options.build)?)
        };
        let run = CommandLine::parse(&options.run)?;

        Ok(Self {
            build,
            run,
            stop_timeout: options.stop_timeout,
            state: Mutex::new(SupervisorState::default()),
            restart_gate: Mutex::new(()),
            spawn_count: AtomicU64::new(0),
            events,
        })
    }

    /// Build the project and launch the run command.
    ///
    /// Returns once the child has been spawned; it does not wait for the
    /// child to exit. A build failure returns [`DevloopError::BuildFailed`]
    /// without spawning anything.
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        if state.child.is_some() {
            debug!("start called while an app is running; stopping it first");
            self.stop_locked(&mut state).await;
        }

        self.run_build().await?;

        self.events.info("Starting app...");
        let running = self.spawn_run()?;
        state.child = Some(running);
        Ok(())
    }

    /// Stop the running app, waiting for it to exit. No-op when nothing is
    /// running.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;
    }

    /// Stop, announce the restart, then start again.
    ///
    /// Concurrent callers queue up behind each other. The error from `start`
    /// is logged and returned; the caller decides whether to retry.
    pub async fn restart(&self, reason: RestartReason) -> Result<()> {
        let _gate = self.restart_gate.lock().await;
        info!(%reason, "restart sequence begins");

        self.events.info(reason.announcement());
        self.stop().await;
        self.events.restarted();

        match self.start().await {
            Ok(()) => {
                self.events.info(format!("{} successful", reason.label()));
                Ok(())
            }
            Err(err) => {
                self.events.error(format!("{} failed: {err}", reason.label()));
                Err(err)
            }
        }
    }

    /// Whether a child handle is currently recorded.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.child.is_some()
    }

    /// Pid of the recorded child, if any.
    pub async fn current_pid(&self) -> Option<u32> {
        self.state
            .lock()
            .await
            .child
            .as_ref()
            .and_then(|running| running.pid)
    }

    /// Number of times the run command has been launched (or attempted).
    pub fn spawn_count(&self) -> u64 {
        self.spawn_count.load(Ordering::SeqCst)
    }

    async fn run_build(&self) -> Result<()> {
        let Some(build) = &self.build else {
            debug!("no build command configured; skipping build step");
            return Ok(());
        };

        self.events.build(BuildStatus::Building);
        self.events.info("Building...");
        debug!(cmd = %build, "running build command");

        let output = match build.to_command().stdin(Stdio::null()).output().await {
            Ok(output) => output,
            Err(err) => return Err(self.build_failed(build, err.to_string())),
        };

        self.emit_captured(&output.stdout, false);
        self.emit_captured(&output.stderr, true);

        if !output.status.success() {
            return Err(self.build_failed(build, output.status.to_string()));
        }

        self.events.info("Build successful");
        self.events.build(BuildStatus::Succeeded);
        Ok(())
    }

    fn build_failed(&self, build: &CommandLine, reason: String) -> DevloopError {
        self.events.error(format!("Build failed: {reason}"));
        self.events.build(BuildStatus::Failed);
        DevloopError::BuildFailed {
            command: build.to_string(),
            reason,
        }
    }

    fn emit_captured(&self, bytes: &[u8], is_error: bool) {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim();
        if !text.is_empty() {
            self.events.log(text, is_error);
        }
    }

    fn spawn_run(&self) -> Result<RunningChild> {
        let mut cmd = self.run.to_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        self.spawn_count.fetch_add(1, Ordering::SeqCst);

        let mut child = cmd.spawn().map_err(|source| {
            self.events.error(format!("Failed to start app: {source}"));
            DevloopError::SpawnFailed {
                command: self.run.to_string(),
                source,
            }
        })?;

        let pid = child.id();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_line_reader(stdout, false, self.events.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_line_reader(stderr, true, self.events.clone()));
        }

        info!(pid, cmd = %self.run, "app started");
        if let Some(pid) = pid {
            self.events.started(pid);
        }
        Ok(RunningChild {
            child,
            pid,
            _readers: readers,
        })
    }

    async fn stop_locked(&self, state: &mut SupervisorState) {
        let Some(mut running) = state.child.take() else {
            return;
        };

        self.events.info("Stopping app...");

        if let Err(err) = signal::interrupt(&running.child) {
            debug!(pid = running.pid, error = %err, "graceful stop rejected");
            self.events.error("Graceful stop failed, killing...");
            if let Err(err) = running.child.start_kill() {
                warn!(pid = running.pid, error = %err, "failed to kill app process");
            }
        }

        match tokio::time::timeout(self.stop_timeout, running.child.wait()).await {
            Ok(Ok(status)) => {
                info!(pid = running.pid, %status, "app exited");
            }
            Ok(Err(err)) => {
                warn!(pid = running.pid, error = %err, "failed waiting for app to exit");
            }
            Err(_) => {
                self.events.error(format!(
                    "App did not exit within {:?}, killing...",
                    self.stop_timeout
                ));
                // `kill` waits for the process after signalling it.
                if let Err(err) = running.child.kill().await {
                    warn!(pid = running.pid, error = %err, "failed to kill app process");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::channel;

    #[test]
    fn empty_build_command_means_no_build_step() {
        let (events, _rx) = channel(8);
        let sup = ProcessSupervisor::new(SupervisorOptions::new("  ", "./app"), events).unwrap();
        assert!(sup.build.is_none());
        assert_eq!(sup.run.program(), "./app");
    }

    #[test]
    fn empty_run_command_is_rejected() {
        let (events, _rx) = channel(8);
        let res = ProcessSupervisor::new(SupervisorOptions::new("go build", ""), events);
        assert!(matches!(res, Err(DevloopError::EmptyCommand(_))));
    }

    #[tokio::test]
    async fn stop_without_child_emits_nothing() {
        let (events, mut rx) = channel(8);
        let sup = ProcessSupervisor::new(SupervisorOptions::new("", "sleep 5"), events).unwrap();

        sup.stop().await;

        assert!(!sup.is_running().await);
        assert!(rx.try_recv().is_err());
    }
}
