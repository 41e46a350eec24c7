//! External Command Invocation
//!
//! Each combination is handed to the platform shell as one command line
//! (`sh -c` on unix, `cmd /C` on windows). The call blocks until the
//! benchmark exits and its stdio is inherited, so the benchmark's own output
//! streams through untouched. The exit state is captured as a first-class
//! outcome; deciding what a nonzero exit means is the executor's job.

use std::fmt;
use std::process::{Command, ExitStatus, Stdio};

/// Errors raised while invoking the external command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The shell itself could not be started.
    #[error("Failed to invoke shell: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Exit state of one external run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The command exited with code 0.
    Success,
    /// The command exited with a nonzero code.
    Exited(i32),
    /// The command was terminated without an exit code (e.g., by a signal).
    Terminated,
}

impl RunStatus {
    /// Whether the run finished cleanly.
    pub fn success(self) -> bool {
        matches!(self, RunStatus::Success)
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            RunStatus::Success
        } else if let Some(code) = status.code() {
            RunStatus::Exited(code)
        } else {
            RunStatus::Terminated
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "exited successfully"),
            RunStatus::Exited(code) => write!(f, "exited with code {}", code),
            RunStatus::Terminated => write!(f, "was terminated by a signal"),
        }
    }
}

/// Run one command line through the platform shell, blocking until it exits.
pub fn run_shell(command_line: &str) -> Result<RunStatus, RunError> {
    tracing::debug!("Invoking: {}", command_line);
    let status = shell_command(command_line)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    Ok(RunStatus::from(status))
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}
