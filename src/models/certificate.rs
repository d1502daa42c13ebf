//! Certificate information types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A parsed X.509 certificate.
///
/// Holds the exact DER bytes it was parsed from along with the fields
/// needed for reporting. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub subject: String,
    pub issuer: String,
    /// Colon-separated upper-case hex
    pub serial: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Subject equals issuer. Informational only.
    pub is_self_signed: bool,
    /// SHA-256 over the DER encoding
    pub fingerprint: String,
    #[serde(skip)]
    pub(crate) der: Vec<u8>,
}

impl Certificate {
    /// DER encoding exactly as read from the PEM payload
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Consume the certificate, returning its DER encoding
    pub fn into_der(self) -> Vec<u8> {
        self.der
    }

    /// Common name from the subject, if present
    pub fn subject_cn(&self) -> Option<&str> {
        extract_cn(&self.subject)
    }
}

/// Position of a certificate within a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainRole {
    Leaf,
    Intermediate,
    Root,
}

impl fmt::Display for ChainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainRole::Leaf => write!(f, "Leaf"),
            ChainRole::Intermediate => write!(f, "Intermediate"),
            ChainRole::Root => write!(f, "Root"),
        }
    }
}

fn extract_cn(name: &str) -> Option<&str> {
    name.split(", ")
        .find_map(|part| part.strip_prefix("CN="))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cn() {
        assert_eq!(
            extract_cn("C=US, O=Example, CN=example.com"),
            Some("example.com")
        );
        assert_eq!(extract_cn("O=No Common Name"), None);
    }
}
