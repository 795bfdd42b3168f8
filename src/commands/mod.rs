// src/commands/mod.rs

//! Command files and the commands they contain.
//!
//! A command file is plain text, one shell command per line. Blank lines and
//! lines starting with `#` are ignored, and an optional leading `#!` line
//! chooses the shell for every command in that file.

pub mod loader;
pub mod shebang;

use std::path::PathBuf;

pub use loader::{load_commands, load_sources, probe_paths};
pub use shebang::shebang;

/// One runnable command line. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub script: String,
    /// Shell declared by the source file (`#!`), if any.
    pub shell: Option<String>,
    pub working_directory: Option<PathBuf>,
}

impl Command {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            shell: None,
            working_directory: None,
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }
}

/// Commands read from a single command file.
#[derive(Debug, Clone)]
pub struct CommandSource {
    /// Name as given on the command line.
    pub name: String,
    /// The probed path that was actually read.
    pub path: PathBuf,
    pub commands: Vec<Command>,
}

/// Split command-file contents into commands.
///
/// `#!` lines are comments too, so the shebang never becomes a command.
pub fn parse_commands(content: &str) -> Vec<Command> {
    let shell = shebang(content);

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|script| Command {
            script: script.to_string(),
            shell: shell.clone(),
            working_directory: None,
        })
        .collect()
}
