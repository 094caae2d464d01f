// src/exec/signal.rs

//! Graceful interrupt delivery.

use tokio::process::Child;

use crate::errors::Result;
#[cfg(not(unix))]
use crate::errors::DevloopError;

/// Ask `child` to shut down by sending it SIGINT.
///
/// A child that has already been reaped has no pid and is treated as
/// stopped.
#[cfg(unix)]
pub fn interrupt(child: &Child) -> Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    use crate::errors::DevloopError;

    let Some(pid) = child.id() else {
        return Ok(());
    };
    let raw = i32::try_from(pid)
        .map_err(|_| DevloopError::SignalFailed(format!("pid {pid} out of range")))?;

    kill(Pid::from_raw(raw), Signal::SIGINT)
        .map_err(|errno| DevloopError::SignalFailed(format!("SIGINT to pid {pid}: {errno}")))
}

/// There is no portable interrupt outside unix; callers fall back to a kill.
#[cfg(not(unix))]
pub fn interrupt(_child: &Child) -> Result<()> {
    Err(DevloopError::SignalFailed(
        "interrupt signals are not supported on this platform".to_string(),
    ))
}
