// src/engine/mod.rs

//! Orchestration engine for parallel-rc.
//!
//! This module ties together:
//! - the concurrency [`limiter`] (bounded, FIFO admission)
//! - the per-run task table ([`tasks`]) enforcing each task's lifecycle
//! - the [`orchestrator`] that wires executor output through loggers and
//!   mediators and drives cancellation
//! - the final [`report`]
//!
//! The whole run shares one cancellation token. Fail-fast failures cancel it;
//! an external interrupt cancels its parent. Either way un-started tasks are
//! skipped and live children are interrupted through the process registry.

pub mod limiter;
pub mod orchestrator;
pub mod report;
pub mod tasks;

pub use limiter::{Limiter, LimiterClosed, Slot};
pub use orchestrator::{Orchestrator, OrchestratorOptions};
pub use report::{Failure, RunReport};
pub use tasks::{Task, TaskTable};
