//! Application settings configuration
//!
//! Input and output paths, PEM handling, and post-write verification.

use crate::cert_ops::reader::PemBlockPolicy;
use crate::cert_ops::writer::{DEFAULT_MODE, DEFAULT_OUTPUT};
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Certificate input files
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub root: PathBuf,
    /// Ordered from the leaf side towards the root
    pub intermediates: Vec<PathBuf>,
    pub leaf: PathBuf,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("root.crt"),
            intermediates: vec![PathBuf::from("intermediate.crt")],
            leaf: PathBuf::from("final.crt"),
        }
    }
}

/// Container output file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub path: PathBuf,
    /// Unix permission bits for a newly created file
    pub mode: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            mode: DEFAULT_MODE,
        }
    }
}

/// PEM parsing settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PemSettings {
    pub policy: PemBlockPolicy,
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub inputs: InputSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub pem: PemSettings,
    /// Re-read the written container and compare it with the chain
    #[serde(default)]
    pub verify_output: bool,
}

impl Settings {
    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.mode > 0o777 {
            return Err(ConfigError::InvalidValue {
                key: "output.mode".to_string(),
                message: format!("{:#o} is not a permission mode", self.output.mode),
            });
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
