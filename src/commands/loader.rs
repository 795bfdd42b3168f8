// src/commands/loader.rs

use std::path::PathBuf;

use tracing::debug;

use crate::commands::{parse_commands, Command, CommandSource};
use crate::errors::{ParallelRcError, Result};
use crate::fs::FileSystem;

/// Candidate paths for a command-file name, in probing order.
///
/// The `.rc` extension may be omitted on the command line, so `build` probes
/// `build.rc` first and then `build` itself.
pub fn probe_paths(name: &str) -> Vec<PathBuf> {
    vec![PathBuf::from(format!("{name}.rc")), PathBuf::from(name)]
}

/// Read every named command file.
///
/// Fails with [`ParallelRcError::SourceNotFound`] for the first name where no
/// probed path is a regular file. Nothing is scheduled until all files load.
pub fn load_sources(fs: &dyn FileSystem, filenames: &[String]) -> Result<Vec<CommandSource>> {
    filenames
        .iter()
        .map(|name| load_source(fs, name))
        .collect()
}

/// Read every named command file and concatenate their commands in argument
/// order. A command's position in the returned list is its task index.
pub fn load_commands(fs: &dyn FileSystem, filenames: &[String]) -> Result<Vec<Command>> {
    let sources = load_sources(fs, filenames)?;
    Ok(sources.into_iter().flat_map(|s| s.commands).collect())
}

fn load_source(fs: &dyn FileSystem, name: &str) -> Result<CommandSource> {
    let tried = probe_paths(name);

    let Some(path) = tried.iter().find(|p| fs.is_file(p)).cloned() else {
        return Err(ParallelRcError::SourceNotFound {
            name: name.to_string(),
            tried,
        });
    };

    let content = fs.read_to_string(&path)?;
    let commands = parse_commands(&content);

    debug!(
        name,
        path = %path.display(),
        commands = commands.len(),
        "loaded command file"
    );

    Ok(CommandSource {
        name: name.to_string(),
        path,
        commands,
    })
}
