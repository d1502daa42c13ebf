//! Data models for p12-chain
//!
//! This module contains the data structures passed between pipeline stages.

pub mod certificate;

pub use certificate::{Certificate, ChainRole};
