// src/events/sink.rs

//! Event consumers.

use tokio::sync::mpsc;
use tracing::debug;

use super::{BuildStatus, LogEvent, SupervisorEvent};

/// Consumer side of the event channel. The presentation layer implements
/// this; [`StdioSink`] is the default.
pub trait EventSink: Send {
    fn on_log(&mut self, event: &LogEvent);

    fn on_restart(&mut self);

    fn on_start(&mut self, _pid: u32) {}

    fn on_build(&mut self, _status: BuildStatus) {}
}

/// Writes informational lines to stdout and error lines to stderr.
#[derive(Debug, Default)]
pub struct StdioSink {
    timestamps: bool,
    restarts: u64,
    last_build: Option<BuildStatus>,
}

impl StdioSink {
    pub fn new(timestamps: bool) -> Self {
        Self {
            timestamps,
            ..Self::default()
        }
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn last_build(&self) -> Option<BuildStatus> {
        self.last_build
    }

    fn format(&self, event: &LogEvent) -> String {
        if self.timestamps {
            format!("[{}] {}", event.timestamp.format("%H:%M:%S"), event.message)
        } else {
            event.message.clone()
        }
    }
}

impl EventSink for StdioSink {
    fn on_log(&mut self, event: &LogEvent) {
        let line = self.format(event);
        if event.is_error {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn on_restart(&mut self) {
        self.restarts += 1;
        println!("Restart #{}", self.restarts);
    }

    fn on_build(&mut self, status: BuildStatus) {
        self.last_build = Some(status);
    }
}

/// Pump events from `rx` into `sink` until every sender has been dropped.
///
/// Returns the sink so callers can inspect whatever state it accumulated.
pub async fn drain_events<S: EventSink>(
    mut rx: mpsc::Receiver<SupervisorEvent>,
    mut sink: S,
) -> S {
    while let Some(event) = rx.recv().await {
        match event {
            SupervisorEvent::Log(ev) => sink.on_log(&ev),
            SupervisorEvent::Started(pid) => sink.on_start(pid),
            SupervisorEvent::Restarted => sink.on_restart(),
            SupervisorEvent::Build(status) => sink.on_build(status),
        }
    }
    debug!("event channel closed; sink drained");
    sink
}
