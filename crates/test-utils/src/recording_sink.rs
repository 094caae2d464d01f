use devloop::events::{BuildStatus, EventSink, LogEvent, SupervisorEvent};
use tokio::sync::mpsc;

/// An `EventSink` that keeps everything it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub logs: Vec<LogEvent>,
    pub starts: Vec<u32>,
    pub restarts: usize,
    pub builds: Vec<BuildStatus>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain whatever is queued in `rx` right now, without waiting.
    pub fn collect_pending(rx: &mut mpsc::Receiver<SupervisorEvent>) -> Self {
        let mut sink = Self::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                SupervisorEvent::Log(ev) => sink.on_log(&ev),
                SupervisorEvent::Started(pid) => sink.on_start(pid),
                SupervisorEvent::Restarted => sink.on_restart(),
                SupervisorEvent::Build(status) => sink.on_build(status),
            }
        }
        sink
    }

    pub fn messages(&self) -> Vec<&str> {
        self.logs.iter().map(|ev| ev.message.as_str()).collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.logs
            .iter()
            .filter(|ev| ev.is_error)
            .map(|ev| ev.message.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.logs.iter().any(|ev| ev.message.contains(needle))
    }
}

impl EventSink for RecordingSink {
    fn on_log(&mut self, event: &LogEvent) {
        self.logs.push(event.clone());
    }

    fn on_restart(&mut self) {
        self.restarts += 1;
    }

    fn on_start(&mut self, pid: u32) {
        self.starts.push(pid);
    }

    fn on_build(&mut self, status: BuildStatus) {
        self.builds.push(status);
    }
}
