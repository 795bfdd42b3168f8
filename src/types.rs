use std::fmt;

/// Which child output stream (or console stream) a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Why a task did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The process ran and exited with a non-zero code.
    ExitCode(i32),
    /// The process was terminated by a signal (e.g. `SIGINT`).
    Signal(String),
    /// The process could not be created (missing shell, bad cwd, ...).
    SpawnError(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ExitCode(code) => write!(f, "exit code {code}"),
            FailureReason::Signal(name) => write!(f, "signal {name}"),
            FailureReason::SpawnError(msg) => write!(f, "spawn error: {msg}"),
        }
    }
}

/// Terminal outcome of a single task process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(FailureReason),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }

    /// Classify a raw exit code: 0 is success, anything else a failure.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            TaskOutcome::Success
        } else {
            TaskOutcome::Failed(FailureReason::ExitCode(code))
        }
    }
}

/// Lifecycle of a task inside one orchestrated run.
///
/// `Pending -> Running -> {Succeeded, Failed}`. A task that is never admitted
/// (cancelled before its turn) stays `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed(FailureReason),
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed(_))
    }
}
