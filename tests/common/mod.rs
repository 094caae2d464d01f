#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[allow(unused_imports)]
pub use devloop_test_utils::{init_tracing, with_timeout};
use devloop::events::SupervisorEvent;
use devloop_test_utils::RecordingSink;
use tokio::sync::mpsc;

/// Write an `sh` script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write test script");
    path
}

/// Poll `rx` until the collected events satisfy `pred`, or give up after
/// five seconds. Returns everything collected so far.
pub async fn wait_for_events<F>(rx: &mut mpsc::Receiver<SupervisorEvent>, pred: F) -> RecordingSink
where
    F: Fn(&RecordingSink) -> bool,
{
    let mut all = RecordingSink::new();
    for _ in 0..500 {
        let batch = RecordingSink::collect_pending(rx);
        all.logs.extend(batch.logs);
        all.starts.extend(batch.starts);
        all.restarts += batch.restarts;
        all.builds.extend(batch.builds);
        if pred(&all) {
            return all;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    all
}

/// Whether a process with `pid` still exists (zombies included).
#[cfg(unix)]
pub fn pid_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), None).is_ok()
}
