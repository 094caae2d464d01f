// src/control.rs

//! Manual restart requests read from stdin.
//!
//! Typing `r` (or `rs`) followed by Enter restarts the app immediately,
//! skipping the debounce window. The request goes through the same
//! single-flight restart path as file changes.

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::events::EventSender;
use crate::exec::{RestartReason, SupervisorBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Restart,
}

/// Interpret one line of user input.
pub fn parse_command(line: &str) -> Option<ControlCommand> {
    match line.trim().to_lowercase().as_str() {
        "r" | "rs" | "restart" => Some(ControlCommand::Restart),
        _ => None,
    }
}

/// Spawn the stdin control surface.
///
/// Stdin is read on a plain OS thread: a blocking read cannot be cancelled,
/// and on a tokio blocking thread it would hold up runtime shutdown until
/// the user pressed Enter. The returned task ends when stdin reaches EOF.
pub fn spawn_stdin_control<B>(backend: Arc<B>, events: EventSender) -> JoinHandle<()>
where
    B: SupervisorBackend + ?Sized + 'static,
{
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();

    let reader = std::thread::Builder::new()
        .name("devloop-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(err) = reader {
        warn!(error = %err, "could not start stdin reader; manual restarts disabled");
    }

    tokio::spawn(run_control(line_rx, backend, events))
}

/// Act on each line received from the control input until it closes.
pub async fn run_control<B>(
    mut lines: mpsc::UnboundedReceiver<String>,
    backend: Arc<B>,
    events: EventSender,
) where
    B: SupervisorBackend + ?Sized + 'static,
{
    while let Some(line) = lines.recv().await {
        match parse_command(&line) {
            Some(ControlCommand::Restart) => {
                // Failures are reported to the sink by the backend itself.
                if let Err(err) = backend.restart(RestartReason::Manual).await {
                    debug!(error = %err, "manual restart failed; waiting for next command");
                }
            }
            None if line.trim().is_empty() => {}
            None => {
                events.info(format!(
                    "Unknown command {:?}; type `r` and Enter to restart",
                    line.trim()
                ));
            }
        }
    }

    debug!("stdin closed; manual restart control finished");
}
