//! p12-chain Library
//!
//! Packages a PEM certificate chain into a PKCS#12 container that carries
//! no private key and uses an empty password:
//! - Loading one PEM `CERTIFICATE` block per file and parsing it as X.509
//! - Ordering root, intermediates and leaf into a leaf-first chain
//! - Encoding the chain as PKCS#12 trusted-certificate entries
//! - Writing the container and optionally reading it back to verify it
//!
//! # Usage
//!
//! ```rust,ignore
//! use p12_chain::cert_ops::{assemble, encode_chain, load_certificate, PemBlockPolicy};
//! use p12_chain::cert_ops::EMPTY_PASSWORD;
//! use std::path::Path;
//!
//! let load = |p: &str| load_certificate(Path::new(p), PemBlockPolicy::FirstBlock);
//! let root = load("root.crt")?.certificate;
//! let intermediate = load("intermediate.crt")?.certificate;
//! let leaf = load("final.crt")?.certificate;
//! let chain = assemble(root, intermediate, leaf);
//! let p12 = encode_chain(&chain, EMPTY_PASSWORD)?;
//! ```

pub mod cert_ops;
pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use cert_ops::CertificateChain;
pub use cli::Cli;
pub use config::Settings;
pub use models::{Certificate, ChainRole};
pub use runner::{load_chain, run_pipeline, LoadedChain, PipelineEvent, PipelineReport};
pub use utils::{CertFileError, Result, Stage, ToolkitError};
