//! Utility modules for p12-chain
//!
//! This module contains the error types shared by every pipeline stage.

pub mod error;

pub use error::{CertFileError, ConfigError, Result, Stage, ToolkitError};
