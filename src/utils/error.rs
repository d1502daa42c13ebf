//! Custom error types for p12-chain
//!
//! This module defines domain-specific error types using `thiserror` for
//! every failure mode of the packaging pipeline.

use std::fmt;
use thiserror::Error;

/// Top-level error type for the p12-chain application
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: CertFileError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ToolkitError {
    /// Attach a stage label to a certificate file error
    pub fn at(stage: Stage) -> impl FnOnce(CertFileError) -> ToolkitError {
        move |source| ToolkitError::Stage { stage, source }
    }

    /// Stage that failed, if the error came from the pipeline
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ToolkitError::Stage { stage, .. } => Some(*stage),
            ToolkitError::Config(_) => None,
        }
    }

    /// Process exit code for this failure kind
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolkitError::Config(_) => 2,
            ToolkitError::Stage { source, .. } => source.exit_code(),
        }
    }
}

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadRoot,
    LoadIntermediate(usize),
    LoadLeaf,
    Encode,
    Write,
    Verify,
}

impl Stage {
    /// Short machine-friendly name used in JSON output
    pub fn name(&self) -> &'static str {
        match self {
            Stage::LoadRoot => "load-root",
            Stage::LoadIntermediate(_) => "load-intermediate",
            Stage::LoadLeaf => "load-leaf",
            Stage::Encode => "encode",
            Stage::Write => "write",
            Stage::Verify => "verify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::LoadRoot => write!(f, "Error reading root certificate"),
            Stage::LoadIntermediate(0) => write!(f, "Error reading intermediate certificate"),
            Stage::LoadIntermediate(n) => {
                write!(f, "Error reading intermediate certificate #{}", n + 1)
            }
            Stage::LoadLeaf => write!(f, "Error reading final certificate"),
            Stage::Encode => write!(f, "Error encoding PKCS#12 structure"),
            Stage::Write => write!(f, "Error writing PKCS#12 file"),
            Stage::Verify => write!(f, "Error verifying PKCS#12 file"),
        }
    }
}

/// Certificate file operation errors
#[derive(Error, Debug)]
pub enum CertFileError {
    #[error("error reading certificate file {path}: {message}")]
    FileReadError { path: String, message: String },

    #[error("failed to decode certificate PEM from file {path}: {message}")]
    PemDecodeError { path: String, message: String },

    #[error("error parsing certificate from file {path}: {message}")]
    X509ParseError { path: String, message: String },

    #[error("PKCS#12 encoding failed: {message}")]
    Pkcs12EncodeError { message: String },

    #[error("PKCS#12 decoding failed: {message}")]
    Pkcs12DecodeError { message: String },

    #[error("failed to write {path}: {message}")]
    FileWriteError { path: String, message: String },

    #[error("{path} does not match the packaged chain: {message}")]
    VerificationFailed { path: String, message: String },
}

impl CertFileError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CertFileError::FileReadError { .. } => 3,
            CertFileError::PemDecodeError { .. } => 4,
            CertFileError::X509ParseError { .. } => 5,
            CertFileError::Pkcs12EncodeError { .. } => 6,
            CertFileError::FileWriteError { .. } => 7,
            CertFileError::Pkcs12DecodeError { .. } | CertFileError::VerificationFailed { .. } => 8,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
