// src/lib.rs

pub mod cli;
pub mod config;
pub mod control;
pub mod errors;
pub mod events;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{Settings, load_settings};
use crate::events::{StdioSink, drain_events};
use crate::exec::ProcessSupervisor;
use crate::watch::watch_and_run;

/// How long shutdown waits for queued events to be printed.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the event channel and the stdout/stderr sink
/// - the process supervisor
/// - the file watcher and the stdin restart control
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let (events, event_rx) = events::channel(settings.queue_capacity);
    let drain = tokio::spawn(drain_events(event_rx, StdioSink::new(args.timestamps)));

    let supervisor = Arc::new(ProcessSupervisor::new(
        settings.supervisor_options(),
        events.clone(),
    )?);

    events.info("Starting devloop...");

    let control = (!args.no_stdin)
        .then(|| control::spawn_stdin_control(Arc::clone(&supervisor), events.clone()));

    let mut watcher = tokio::spawn(watch_and_run(
        settings.watch_options(),
        Arc::clone(&supervisor),
        events.clone(),
    ));

    let (outcome, watcher_finished) = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            info!("shutdown requested");
            (Ok(()), false)
        }
        res = &mut watcher => {
            let outcome = match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(anyhow::Error::from(err)),
                Err(join_err) => Err(anyhow::Error::from(join_err)),
            };
            (outcome, true)
        }
    };

    // Tear down producers first so the sink sees every final line.
    if !watcher_finished {
        watcher.abort();
        let _ = watcher.await;
    }
    if let Some(control) = control {
        control.abort();
        let _ = control.await;
    }

    supervisor.stop().await;
    events.info("devloop stopped.");

    drop(supervisor);
    drop(events);
    if tokio::time::timeout(DRAIN_GRACE, drain).await.is_err() {
        debug!("event sink still busy at shutdown; exiting anyway");
    }

    outcome
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(settings: &Settings) {
    println!("devloop dry-run");
    if settings.build.is_empty() {
        println!("  build: (none)");
    } else {
        println!("  build: {}", settings.build);
    }
    println!("  run: {}", settings.run);
    println!("  root: {}", settings.root.display());
    println!("  debounce: {:?}", settings.debounce);
    println!("  extensions: {:?}", settings.extensions);
    println!("  ignore: {:?}", settings.ignore);
    println!("  stop_timeout: {:?}", settings.stop_timeout);
    println!("  queue_capacity: {}", settings.queue_capacity);

    debug!("dry-run complete (no execution)");
}
