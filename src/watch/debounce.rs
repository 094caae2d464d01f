// src/watch/debounce.rs

//! Reset-not-stack debounce timer.
//!
//! There is at most one pending deadline. Arming the timer while it is
//! pending pushes that deadline forward to `now + quiet`; it never creates a
//! second timer. A burst of changes (save-then-format, a multi-file
//! refactor) therefore settles into a single firing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

use crate::exec::{RestartReason, SupervisorBackend};

/// Default quiet period.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(750);

// Deadline used when `now + quiet` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug)]
pub struct DebounceTimer {
    quiet: Duration,
    deadline: Mutex<Option<Instant>>,
    armed: Notify,
}

impl DebounceTimer {
    pub fn new(quiet: Duration) -> Arc<Self> {
        Arc::new(Self {
            quiet,
            deadline: Mutex::new(None),
            armed: Notify::new(),
        })
    }

    /// Arm the timer, or push the pending deadline out to `now + quiet`.
    pub fn arm(&self) {
        let now = Instant::now();
        let deadline = now.checked_add(self.quiet).unwrap_or(now + FAR_FUTURE);
        let previous = self.lock().replace(deadline);
        trace!(reset = previous.is_some(), "debounce timer armed");
        self.armed.notify_one();
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    /// Wait until a quiet period elapses with no further `arm` calls.
    ///
    /// Consumes the pending deadline, so each burst settles exactly once.
    pub async fn settled(&self) {
        loop {
            let deadline = *self.lock();
            let Some(deadline) = deadline else {
                self.armed.notified().await;
                continue;
            };

            sleep_until(deadline).await;

            let mut pending = self.lock();
            match *pending {
                Some(current) if current <= Instant::now() => {
                    *pending = None;
                    return;
                }
                // Re-armed while we slept; wait for the new deadline.
                _ => continue,
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        self.deadline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spawn the task that restarts `backend` every time the timer settles.
///
/// Restarts run inside this task one at a time; changes that arrive during a
/// restart re-arm the timer and produce one more restart afterwards. A failed
/// restart has already been reported by the backend and leaves the loop
/// running, waiting for the next change.
pub fn spawn_restart_on_settle<B>(timer: Arc<DebounceTimer>, backend: Arc<B>) -> JoinHandle<()>
where
    B: SupervisorBackend + ?Sized + 'static,
{
    tokio::spawn(async move {
        loop {
            timer.settled().await;
            debug!("debounce window settled; restarting");
            if let Err(err) = backend.restart(RestartReason::FileChange).await {
                debug!(error = %err, "restart failed; waiting for next change");
            }
        }
    })
}
