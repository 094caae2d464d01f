// src/exec/output.rs

//! Line readers for child process pipes.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::EventSender;

/// Spawn a task that forwards every non-blank line of `pipe` as a log event.
///
/// Lines keep the order in which the process wrote them. The task ends when
/// the pipe is closed, which happens once the child exits. Output that is
/// not valid UTF-8 is decoded lossily.
pub fn spawn_line_reader<R>(pipe: R, is_error: bool, events: EventSender) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut segments = BufReader::new(pipe).split(b'\n');

        loop {
            match segments.next_segment().await {
                Ok(Some(raw)) => {
                    let line = String::from_utf8_lossy(&raw);
                    let line = line.trim_end_matches('\r');
                    if line.trim().is_empty() {
                        continue;
                    }
                    events.log(line, is_error);
                }
                Ok(None) => break,
                Err(err) => {
                    debug!(is_error, error = %err, "output reader failed");
                    break;
                }
            }
        }

        debug!(is_error, "output reader finished (pipe closed)");
    })
}
