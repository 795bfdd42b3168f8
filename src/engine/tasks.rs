// src/engine/tasks.rs

//! Per-run task bookkeeping.

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::commands::Command;
use crate::engine::report::{Failure, RunReport};
use crate::types::{TaskOutcome, TaskState};

/// One scheduled execution of a command, identified by its submission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub index: usize,
    pub command: Command,
    pub state: TaskState,
}

#[derive(Debug, Default)]
struct TableState {
    tasks: Vec<Task>,
    /// Append-only, in arrival order; sorted only when reporting.
    failures: Vec<Failure>,
    running: usize,
    max_running: usize,
}

/// Shared state of every task in one run.
///
/// Enforces the lifecycle `Pending -> Running -> {Succeeded, Failed}`: each
/// task starts at most once and reaches exactly one terminal state.
#[derive(Debug)]
pub struct TaskTable {
    state: Mutex<TableState>,
}

impl TaskTable {
    pub fn new(commands: &[Command]) -> Self {
        let tasks = commands
            .iter()
            .enumerate()
            .map(|(index, command)| Task {
                index,
                command: command.clone(),
                state: TaskState::Pending,
            })
            .collect();

        Self {
            state: Mutex::new(TableState {
                tasks,
                ..TableState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `Pending -> Running`. Returns `false` (and changes nothing) for an
    /// unknown index or a task that already started.
    pub fn start(&self, index: usize) -> bool {
        let mut state = self.lock();
        let Some(task) = state.tasks.get_mut(index) else {
            return false;
        };
        if task.state != TaskState::Pending {
            warn!(index, state = ?task.state, "task started twice; ignoring");
            return false;
        }
        task.state = TaskState::Running;

        state.running += 1;
        state.max_running = state.max_running.max(state.running);
        true
    }

    /// `Running -> Succeeded | Failed`. Returns `true` if this call recorded
    /// a new failure.
    ///
    /// A second outcome for the same task is ignored.
    pub fn complete(&self, index: usize, outcome: TaskOutcome) -> bool {
        let mut state = self.lock();
        let Some(task) = state.tasks.get_mut(index) else {
            return false;
        };
        if task.state != TaskState::Running {
            warn!(index, state = ?task.state, ?outcome, "outcome for task that is not running; ignoring");
            return false;
        }

        let failed = match outcome {
            TaskOutcome::Success => {
                task.state = TaskState::Succeeded;
                None
            }
            TaskOutcome::Failed(reason) => {
                task.state = TaskState::Failed(reason.clone());
                Some(Failure { index, reason })
            }
        };

        state.running -= 1;
        match failed {
            Some(failure) => {
                state.failures.push(failure);
                true
            }
            None => false,
        }
    }

    pub fn state_of(&self, index: usize) -> Option<TaskState> {
        self.lock().tasks.get(index).map(|t| t.state.clone())
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn has_failures(&self) -> bool {
        !self.lock().failures.is_empty()
    }

    /// Highest number of tasks that were `Running` at the same time.
    pub fn max_running(&self) -> usize {
        self.lock().max_running
    }

    pub fn report(&self, interrupted: bool) -> RunReport {
        let state = self.lock();
        RunReport::new(&state.tasks, state.failures.clone(), state.max_running, interrupted)
    }
}
