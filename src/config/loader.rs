// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::RawSettings;
use crate::errors::{ParallelRcError, Result};

/// Name of the settings file picked up from the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = ".parallel-rc.toml";

/// Load a settings file from a given path.
///
/// This only performs TOML deserialization; range checks happen when the
/// settings are merged with the command line in
/// [`crate::config::resolve_options`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ParallelRcError::ConfigError(format!("cannot read settings file {:?}: {e}", path))
    })?;

    let settings: RawSettings = toml::from_str(&contents)?;

    Ok(settings)
}

/// Find and load the settings file, if any.
///
/// - An explicit path must exist.
/// - Otherwise `.parallel-rc.toml` in `cwd` is used when present.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Option<RawSettings>> {
    if let Some(path) = explicit {
        return load_from_path(path).map(Some);
    }

    let candidate = default_settings_path(cwd);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "using settings file");
        return load_from_path(&candidate).map(Some);
    }

    Ok(None)
}

pub fn default_settings_path(cwd: &Path) -> PathBuf {
    cwd.join(DEFAULT_SETTINGS_FILE)
}
