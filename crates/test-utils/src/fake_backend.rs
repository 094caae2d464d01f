use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::time::Instant;
use devloop::errors::DevloopError;
use devloop::exec::{BackendFuture, RestartReason, SupervisorBackend};

/// A fake supervisor that:
/// - counts `start` calls
/// - records every restart with its reason and (tokio) timestamp
/// - can be told to fail restarts, like a broken build would.
#[derive(Debug, Default)]
pub struct FakeBackend {
    starts: AtomicUsize,
    restarts: Mutex<Vec<(RestartReason, Instant)>>,
    fail_restarts: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_restarts(&self, fail: bool) {
        self.fail_restarts.store(fail, Ordering::SeqCst);
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn restarts(&self) -> Vec<(RestartReason, Instant)> {
        self.restarts.lock().unwrap().clone()
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.lock().unwrap().len()
    }
}

impl SupervisorBackend for FakeBackend {
    fn start(&self) -> BackendFuture<'_> {
        Box::pin(async move {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn restart(&self, reason: RestartReason) -> BackendFuture<'_> {
        Box::pin(async move {
            self.restarts.lock().unwrap().push((reason, Instant::now()));
            if self.fail_restarts.load(Ordering::SeqCst) {
                return Err(DevloopError::BuildFailed {
                    command: "fake build".to_string(),
                    reason: "exit status: 1".to_string(),
                });
            }
            Ok(())
        })
    }
}
