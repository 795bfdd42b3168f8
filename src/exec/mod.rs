// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running commands, using
//! `tokio::process::Command`, and handing their output back line by line.
//!
//! - [`backend`] provides the `ExecutorBackend` trait the orchestrator uses,
//!   which tests can replace with a fake implementation.
//! - [`process`] is the real executor: shell resolution, spawning, pipe
//!   reading and exit classification.
//! - [`registry`] tracks live children so cancellation can interrupt them.

pub mod backend;
pub mod process;
pub mod registry;

pub use backend::{ExecJob, ExecutorBackend, LineSender, OutputLine};
pub use process::{outcome_from_status, resolve_shell, ProcessExecutor, ShellInvocation};
pub use registry::{interrupt_process, ProcessRegistry};
