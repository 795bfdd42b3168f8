// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The orchestrator talks to an `ExecutorBackend` instead of spawning
//! processes itself. Production uses [`ProcessExecutor`]; tests can provide a
//! backend that scripts output and outcomes without touching the OS.
//!
//! An executor never fails: every terminal state, including failure to spawn,
//! is reported as a [`TaskOutcome`], so one broken command cannot
//! short-circuit the rest of the batch.
//!
//! [`ProcessExecutor`]: super::ProcessExecutor

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::commands::Command;
use crate::exec::ProcessRegistry;
use crate::types::{Stream, TaskOutcome};

/// One complete line of child output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
}

impl OutputLine {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stream: Stream::Stdout,
            text: text.into(),
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            stream: Stream::Stderr,
            text: text.into(),
        }
    }
}

/// Where an executor sends output lines.
///
/// Lines of one stream arrive in the order the child wrote them. The channel
/// closes when the executor drops its last sender, which must not happen
/// before the final line was sent.
pub type LineSender = mpsc::UnboundedSender<OutputLine>;

/// Everything an executor needs to run one task.
#[derive(Debug, Clone)]
pub struct ExecJob {
    pub index: usize,
    pub command: Command,
    /// Live-process registry shared by the whole run.
    pub registry: Arc<ProcessRegistry>,
}

/// Trait abstracting how a single command is executed.
pub trait ExecutorBackend: Send + Sync {
    /// Run `job` to completion, streaming its output through `lines`.
    fn execute(
        &self,
        job: ExecJob,
        lines: LineSender,
    ) -> Pin<Box<dyn Future<Output = TaskOutcome> + Send + '_>>;
}
