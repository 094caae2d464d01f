#![cfg(unix)]

mod common;
use crate::common::{init_tracing, pid_alive, write_script};

use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use devloop::events::{channel, SupervisorEvent};
use devloop::exec::{ProcessSupervisor, RestartReason};
use devloop_test_utils::builders::supervisor_options;
use tokio::time::timeout;

type TestResult = Result<(), Box<dyn Error>>;

/// Fire several restarts at once and follow the event stream. Every spawn
/// must be preceded by a `Restarted` event, which is only emitted once the
/// previous child has been reaped, and that previous child must already be
/// gone when the new pid is reported.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_restarts_never_overlap_processes() -> TestResult {
    init_tracing();
    let (events, mut rx) = channel(4096);
    let sup = Arc::new(ProcessSupervisor::new(
        supervisor_options("", "sleep 5"),
        events,
    )?);

    let monitor = tokio::spawn(async move {
        let mut trail = Vec::new();
        let mut previous: Option<u32> = None;
        let mut overlaps = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                SupervisorEvent::Started(pid) => {
                    if let Some(prev) = previous.filter(|prev| pid_alive(*prev)) {
                        overlaps.push((prev, pid));
                    }
                    previous = Some(pid);
                    trail.push(Some(pid));
                }
                SupervisorEvent::Restarted => trail.push(None),
                _ => {}
            }
        }
        (trail, overlaps)
    });

    sup.start().await?;

    let mut restarts = Vec::new();
    for i in 0..4 {
        let sup = Arc::clone(&sup);
        let reason = if i % 2 == 0 {
            RestartReason::FileChange
        } else {
            RestartReason::Manual
        };
        restarts.push(tokio::spawn(async move { sup.restart(reason).await }));
    }
    for handle in restarts {
        timeout(Duration::from_secs(10), handle).await???;
    }

    assert_eq!(sup.spawn_count(), 5);
    let last = sup.current_pid().await.expect("app running after restarts");
    sup.stop().await;
    assert!(!pid_alive(last));

    // Dropping the last sender lets the monitor finish.
    drop(sup);
    let (trail, overlaps) = timeout(Duration::from_secs(5), monitor).await??;

    assert!(overlaps.is_empty(), "children alive at the same time: {overlaps:?}");
    assert_eq!(trail.len(), 9, "{trail:?}");
    for (i, entry) in trail.iter().enumerate() {
        if i % 2 == 0 {
            assert!(entry.is_some(), "expected a spawn at {i}: {trail:?}");
        } else {
            assert!(entry.is_none(), "expected a restart at {i}: {trail:?}");
        }
    }
    let pids: HashSet<u32> = trail.iter().flatten().copied().collect();
    assert_eq!(pids.len(), 5);
    Ok(())
}

/// A child that records its own start and (trapped) interrupt. Restarts
/// requested from several tasks must leave a trail where every start is
/// followed by the stop of the same process before the next start.
///
/// Requests are spaced out so each child gets to install its trap; an
/// interrupt that lands before that would kill the shell silently.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn restart_trail_strictly_alternates() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let trail = dir.path().join("trail.log");
    let script = write_script(
        dir.path(),
        "app.sh",
        &format!(
            "trap 'echo \"stop $$\" >> {trail}; exit 0' INT\n\
             echo \"start $$\" >> {trail}\n\
             while true; do sleep 0.05; done\n",
            trail = trail.display()
        ),
    );
    let (events, _rx) = channel(4096);
    let sup = Arc::new(ProcessSupervisor::new(
        supervisor_options("", &format!("sh {}", script.display())),
        events,
    )?);

    sup.start().await?;

    let mut restarts = Vec::new();
    for i in 1..=4u64 {
        let sup = Arc::clone(&sup);
        let reason = if i == 4 {
            RestartReason::Manual
        } else {
            RestartReason::FileChange
        };
        restarts.push(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300 * i)).await;
            sup.restart(reason).await
        }));
    }
    for handle in restarts {
        timeout(Duration::from_secs(10), handle).await???;
    }
    // Give the last child time to write its start line before stopping it.
    tokio::time::sleep(Duration::from_millis(200)).await;
    sup.stop().await;

    let contents = std::fs::read_to_string(&trail)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 10, "{contents}");
    for pair in lines.chunks(2) {
        let start = pair[0].strip_prefix("start ").expect("start line");
        let stop = pair[1].strip_prefix("stop ").expect("stop line");
        assert_eq!(start, stop, "stop must belong to the preceding start: {contents}");
    }
    Ok(())
}
