//! Configuration module for p12-chain
//!
//! Settings come from built-in defaults, optionally replaced by a TOML file.
//! Command-line flags are layered on top by the CLI module.

pub mod settings;

pub use settings::{InputSettings, OutputSettings, PemSettings, Settings};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from `path`, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from_file(path),
        None => Ok(Settings::default()),
    }
}
