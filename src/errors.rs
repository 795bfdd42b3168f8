// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only fatal, startup-time problems are errors. Per-task failures are
//! plain [`crate::types::TaskOutcome`] values collected by the orchestrator.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParallelRcError {
    #[error("Option error: {0}")]
    OptionError(String),

    #[error("File not found ({})", display_paths(.tried))]
    SourceNotFound { name: String, tried: Vec<PathBuf> },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("{:?}", p.display().to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ParallelRcError>;
