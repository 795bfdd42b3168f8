#![allow(dead_code)]

use std::time::Duration;

use parallel_rc::commands::Command;
use parallel_rc::types::{FailureReason, TaskOutcome};

use crate::fake_executor::{Script, Step};

/// `Command`s from plain script strings, no shell, no working directory.
pub fn commands(scripts: &[&str]) -> Vec<Command> {
    scripts.iter().map(|s| Command::new(*s)).collect()
}

/// Builder for a [`Script`] played back by the fake executor.
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self {
            script: Script {
                steps: Vec::new(),
                outcome: TaskOutcome::Success,
                ignore_interrupt: false,
            },
        }
    }

    pub fn stdout(mut self, line: &str) -> Self {
        self.script.steps.push(Step::Stdout(line.to_string()));
        self
    }

    pub fn stderr(mut self, line: &str) -> Self {
        self.script.steps.push(Step::Stderr(line.to_string()));
        self
    }

    pub fn sleep_ms(mut self, ms: u64) -> Self {
        self.script.steps.push(Step::Sleep(Duration::from_millis(ms)));
        self
    }

    pub fn exit(mut self, code: i32) -> Self {
        self.script.outcome = TaskOutcome::from_exit_code(code);
        self
    }

    pub fn signal(mut self, name: &str) -> Self {
        self.script.outcome = TaskOutcome::Failed(FailureReason::Signal(name.to_string()));
        self
    }

    pub fn spawn_error(mut self, message: &str) -> Self {
        self.script.outcome = TaskOutcome::Failed(FailureReason::SpawnError(message.to_string()));
        self
    }

    pub fn ignore_interrupt(mut self) -> Self {
        self.script.ignore_interrupt = true;
        self
    }

    pub fn build(self) -> Script {
        self.script
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
