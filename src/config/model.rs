// src/config/model.rs

use serde::Deserialize;

/// Settings file as read from TOML.
///
/// ```toml
/// concurrency = 4
/// run_all = true
/// order = false
/// shell = "bash"
/// color = true
/// dumb_terminal = true
/// ```
///
/// Every key is optional; unset keys fall through to the built-in defaults.
/// Command-line flags always win over values from this file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    /// Values below 1 are rejected during resolution.
    pub concurrency: Option<i64>,
    pub run_all: Option<bool>,
    pub order: Option<bool>,
    pub shell: Option<String>,
    pub color: Option<bool>,
    /// Run children with `TERM=dumb` and strip ANSI escapes from their output.
    pub dumb_terminal: Option<bool>,
}

/// Fully resolved options handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub filenames: Vec<String>,
    /// Maximum number of commands running at once (always >= 1).
    pub concurrency: usize,
    /// Keep running after a failure instead of cancelling the rest.
    pub run_all: bool,
    /// Present output in command order while still running in parallel.
    pub order: bool,
    /// Global shell override for commands without a `#!` shell.
    pub shell: Option<String>,
    /// Explicit color choice; `None` means probe the terminal.
    pub color: Option<bool>,
    pub dumb_terminal: bool,
}

impl Options {
    pub fn new(filenames: Vec<String>) -> Self {
        Self {
            filenames,
            concurrency: default_concurrency(),
            run_all: false,
            order: false,
            shell: None,
            color: None,
            dumb_terminal: true,
        }
    }
}

/// Number of CPUs plus one.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        + 1
}
