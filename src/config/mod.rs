// src/config/mod.rs

//! Option resolution for parallel-rc.
//!
//! Responsibilities:
//! - Define the TOML-backed settings model and the resolved `Options` (`model.rs`).
//! - Find and load an optional settings file (`loader.rs`).
//! - Merge CLI flags over settings and validate the result (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{discover, load_from_path, DEFAULT_SETTINGS_FILE};
pub use model::{default_concurrency, Options, RawSettings};
pub use validate::{resolve_options, validate_options};
