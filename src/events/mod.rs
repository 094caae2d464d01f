// src/events/mod.rs

//! Typed events flowing from the supervisor and watcher to the presentation
//! layer.
//!
//! Producers hold an [`EventSender`]; the consumer owns the receiving half of
//! a bounded channel and drains it into an [`EventSink`]. Delivery is
//! best-effort: when the queue is full the event is dropped and counted
//! rather than stalling the producer.

pub mod sink;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{trace, warn};

pub use sink::{EventSink, StdioSink, drain_events};

/// Default capacity of the event queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// A single line of output, either captured from a process or produced by
/// the supervisor itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub message: String,
    pub is_error: bool,
    pub timestamp: DateTime<Local>,
}

impl LogEvent {
    pub fn new(message: impl Into<String>, is_error: bool) -> Self {
        Self {
            message: message.into(),
            is_error,
            timestamp: Local::now(),
        }
    }
}

/// Outcome of the most recent build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Building,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    Log(LogEvent),
    /// The run command was spawned with this pid.
    Started(u32),
    /// A restart sequence has stopped the old process and is about to start
    /// a new one.
    Restarted,
    Build(BuildStatus),
}

/// Create a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<SupervisorEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let sender = EventSender {
        tx,
        dropped: Arc::new(AtomicU64::new(0)),
    };
    (sender, rx)
}

/// Cloneable producer handle for [`SupervisorEvent`]s.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<SupervisorEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Queue an event without waiting. Drops it if the queue is full.
    pub fn emit(&self, event: SupervisorEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if dropped == 1 || dropped % 100 == 0 {
                    warn!(dropped, "event queue full; dropping events");
                }
            }
            Err(TrySendError::Closed(event)) => {
                trace!(?event, "event receiver closed; discarding event");
            }
        }
    }

    pub fn log(&self, message: impl Into<String>, is_error: bool) {
        self.emit(SupervisorEvent::Log(LogEvent::new(message, is_error)));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(message, false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(message, true);
    }

    pub fn started(&self, pid: u32) {
        self.emit(SupervisorEvent::Started(pid));
    }

    pub fn restarted(&self) {
        self.emit(SupervisorEvent::Restarted);
    }

    pub fn build(&self, status: BuildStatus) {
        self.emit(SupervisorEvent::Build(status));
    }

    /// Number of events dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
