// src/config/validate.rs

use crate::cli::CliArgs;
use crate::config::model::{default_concurrency, Options, RawSettings};
use crate::errors::{ParallelRcError, Result};

/// Merge command-line flags over settings-file values over defaults, and
/// check the result.
///
/// Boolean flags can only switch a behaviour on; a settings file may enable
/// `run_all`/`order` but the command line cannot turn them back off.
pub fn resolve_options(args: &CliArgs, settings: Option<RawSettings>) -> Result<Options> {
    let settings = settings.unwrap_or_default();

    let concurrency = match args.concurrency.or(settings.concurrency) {
        Some(n) => validate_concurrency(n)?,
        None => default_concurrency(),
    };

    let shell = match args.shell.clone().or(settings.shell) {
        Some(shell) => Some(validate_shell(shell)?),
        None => None,
    };

    let options = Options {
        filenames: args.filenames.clone(),
        concurrency,
        run_all: args.run_all || settings.run_all.unwrap_or(false),
        order: args.order || settings.order.unwrap_or(false),
        shell,
        color: args.color_flag().or(settings.color),
        dumb_terminal: settings.dumb_terminal.unwrap_or(true),
    };

    validate_options(&options)?;
    Ok(options)
}

/// Check invariants the orchestrator relies on.
pub fn validate_options(options: &Options) -> Result<()> {
    if options.filenames.is_empty() {
        return Err(ParallelRcError::OptionError(
            "One command filename is required".to_string(),
        ));
    }
    if options.concurrency == 0 {
        return Err(ParallelRcError::OptionError(
            "Concurrency must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_concurrency(n: i64) -> Result<usize> {
    if n < 1 {
        return Err(ParallelRcError::OptionError(format!(
            "Concurrency must be greater than zero (got {n})"
        )));
    }
    usize::try_from(n).map_err(|_| {
        ParallelRcError::OptionError(format!("Concurrency is too large (got {n})"))
    })
}

fn validate_shell(shell: String) -> Result<String> {
    let trimmed = shell.trim();
    if trimmed.is_empty() {
        return Err(ParallelRcError::OptionError(
            "Shell must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
