// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Flags here are only the *command line* layer. Values that are left unset
//! fall back to the settings file and then to built-in defaults; see
//! [`crate::config::resolve_options`].

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `parallel-rc`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "parallel-rc",
    version,
    disable_version_flag = true,
    about = "Simply run multiple commands in parallel.",
    long_about = "Simply run multiple commands in parallel.\n\n\
        Each command in the command file will be run in parallel (limited to the \
        number of CPU cores + 1). The output from each command is prefixed with the \
        command index from the command file (eg. \"0: output\"). If any commands fail, \
        the exit code will be non-zero.\n\n\
        NOTE: The '.rc' extension can be omitted from the filename."
)]
pub struct CliArgs {
    /// Command files to run (the `.rc` extension may be omitted).
    #[arg(value_name = "FILENAME", required = true, num_args = 1..)]
    pub filenames: Vec<String>,

    /// Maximum number of parallel processes.
    #[arg(short, long, value_name = "NUM")]
    pub concurrency: Option<i64>,

    /// Run all commands even if one fails.
    #[arg(short = 'a', long = "all", visible_alias = "run-all")]
    pub run_all: bool,

    /// Print each command's output in command-file order (commands still run
    /// in parallel).
    #[arg(short, long)]
    pub order: bool,

    /// Shell used for commands that do not declare one with `#!`.
    #[arg(short, long, value_name = "SHELL")]
    pub shell: Option<String>,

    /// Explicitly enable color output.
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Explicitly disable color output.
    #[arg(long)]
    pub no_color: bool,

    /// Settings file (TOML). Defaults to `.parallel-rc.toml` if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level for diagnostics (error, warn, info, debug, trace).
    ///
    /// If omitted, `PARALLEL_RC_LOG` or `warn` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Display the current version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl CliArgs {
    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`, else `None`.
    pub fn color_flag(&self) -> Option<bool> {
        if self.no_color {
            Some(false)
        } else if self.color {
            Some(true)
        } else {
            None
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
