// src/engine/report.rs

use crate::engine::tasks::Task;
use crate::output::{Console, Palette, Style};
use crate::types::{FailureReason, Stream, TaskState};

/// A failed task, as listed in the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub index: usize,
    pub reason: FailureReason,
}

/// Summary of one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub total: usize,
    pub succeeded: usize,
    /// Ascending by task index, regardless of completion order.
    pub failures: Vec<Failure>,
    /// Tasks that never started because the run was cancelled.
    pub not_started: Vec<usize>,
    pub max_running: usize,
    /// Whether an external interrupt (Ctrl-C / SIGTERM) cut the run short.
    pub interrupted: bool,
}

impl RunReport {
    pub fn new(
        tasks: &[Task],
        mut failures: Vec<Failure>,
        max_running: usize,
        interrupted: bool,
    ) -> Self {
        failures.sort_by_key(|f| f.index);

        Self {
            total: tasks.len(),
            succeeded: tasks
                .iter()
                .filter(|t| t.state == TaskState::Succeeded)
                .count(),
            failures,
            not_started: tasks
                .iter()
                .filter(|t| t.state == TaskState::Pending)
                .map(|t| t.index)
                .collect(),
            max_running,
            interrupted,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 0 iff no task failed, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }

    /// One line per failure, e.g. `Command #2 failed (exit code 1)`.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("Command #{} failed ({})", f.index, f.reason))
            .collect()
    }

    /// Print the failure lines to stdout, in red when colored.
    pub fn print(&self, console: &dyn Console, palette: &Palette) {
        let red = palette.decoration(Stream::Stdout, Style::Red);
        for line in self.failure_lines() {
            console.write(Stream::Stdout, &format!("{}\n", red(&line)));
        }
    }
}
