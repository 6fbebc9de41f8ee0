use super::ExecutorError;
use std::{
    ffi::OsStr,
    process::{Command, ExitStatus},
    time::{Duration, Instant},
};
use tracing::{debug, instrument, warn};

/// Wall-clock record of a single child process
#[derive(Debug, Clone, Copy)]
pub struct Invocation {
    pub started: Instant,
    pub finished: Instant,
    pub status: ExitStatus,
}

impl Invocation {
    pub fn elapsed(&self) -> Duration {
        self.finished.duration_since(self.started)
    }

    pub fn seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Run `command` to completion on the current thread and time it.
///
/// The child inherits stdio. There is no timeout, a hanging tool blocks the caller. A non-zero
/// exit status is logged but still produces a measurement.
#[instrument(skip_all, level = "debug")]
pub fn invoke<S: AsRef<OsStr>>(command: &[S]) -> Result<Invocation, ExecutorError> {
    let (exec, args) = command.split_first().ok_or(ExecutorError::EmptyCommand)?;
    let exec: &OsStr = exec.as_ref();

    debug!(
        "Executing {:?}",
        command
            .iter()
            .map(|arg| -> &OsStr { arg.as_ref() })
            .collect::<Vec<_>>()
    );

    let started = Instant::now();
    let mut child = Command::new(exec)
        .args(args)
        .spawn()
        .map_err(|source| ExecutorError::Launch {
            exec: exec.to_owned(),
            source,
        })?;
    let status = child.wait().map_err(|source| ExecutorError::Wait {
        exec: exec.to_owned(),
        source,
    })?;
    let finished = Instant::now();

    let invocation = Invocation {
        started,
        finished,
        status,
    };

    if !status.success() {
        warn!(
            status = ?status,
            "{} exited unsuccessfully, keeping its duration",
            exec.to_string_lossy()
        );
    }

    debug!(
        "Finished in {} ns | status: {}",
        invocation.elapsed().as_nanos(),
        status.success()
    );

    Ok(invocation)
}
