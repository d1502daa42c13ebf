//! Certificate file reading
//!
//! Reads a PEM file, takes its first block, and parses it as an X.509
//! certificate.

use crate::models::Certificate;
use crate::utils::CertFileError;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use sha2::Digest;
use std::fmt;
use std::path::Path;
use x509_parser::prelude::*;

/// PEM tag a certificate block must carry
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// What to do with a file holding more than one PEM block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PemBlockPolicy {
    /// Use the first block and report how many were ignored
    #[default]
    FirstBlock,
    /// Reject the file
    Strict,
}

impl fmt::Display for PemBlockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PemBlockPolicy::FirstBlock => write!(f, "first-block"),
            PemBlockPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// A certificate plus what was skipped to get it
#[derive(Debug, Clone)]
pub struct LoadedCertificate {
    pub certificate: Certificate,
    /// PEM blocks after the first one, left unread
    pub ignored_blocks: usize,
}

/// Read and parse the certificate stored at `path`
pub fn load_certificate(
    path: &Path,
    policy: PemBlockPolicy,
) -> Result<LoadedCertificate, CertFileError> {
    let data = std::fs::read(path).map_err(|e| CertFileError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "read certificate file");
    decode_certificate(&data, path, policy)
}

/// Decode the first PEM block of `data` as a certificate.
///
/// `path` is only used for error messages.
pub fn decode_certificate(
    data: &[u8],
    path: &Path,
    policy: PemBlockPolicy,
) -> Result<LoadedCertificate, CertFileError> {
    let block_count = count_pem_blocks(data);
    if block_count == 0 {
        return Err(CertFileError::PemDecodeError {
            path: path.display().to_string(),
            message: "no PEM block found".to_string(),
        });
    }

    // Later blocks are never decoded, so a damaged one cannot fail the load.
    let first = ::pem::parse(data).map_err(|e| CertFileError::PemDecodeError {
        path: path.display().to_string(),
        message: format!("malformed PEM: {}", e),
    })?;
    let ignored_blocks = block_count - 1;

    if first.tag() != CERTIFICATE_TAG {
        return Err(CertFileError::PemDecodeError {
            path: path.display().to_string(),
            message: format!(
                "expected a {} block, found {}",
                CERTIFICATE_TAG,
                first.tag()
            ),
        });
    }

    if ignored_blocks > 0 {
        if policy == PemBlockPolicy::Strict {
            return Err(CertFileError::PemDecodeError {
                path: path.display().to_string(),
                message: format!(
                    "expected exactly one PEM block, found {}",
                    ignored_blocks + 1
                ),
            });
        }
        tracing::warn!(
            path = %path.display(),
            ignored = ignored_blocks,
            "only the first PEM block is used"
        );
    }

    let certificate = parse_certificate(first.into_contents(), path)?;

    Ok(LoadedCertificate {
        certificate,
        ignored_blocks,
    })
}

/// Number of PEM `BEGIN` markers in `data`, well-formed or not
fn count_pem_blocks(data: &[u8]) -> usize {
    const BEGIN_MARKER: &[u8] = b"-----BEGIN ";
    data.windows(BEGIN_MARKER.len())
        .filter(|window| *window == BEGIN_MARKER)
        .count()
}

/// Parse a DER-encoded X.509 certificate
pub fn parse_certificate(der: Vec<u8>, path: &Path) -> Result<Certificate, CertFileError> {
    let parse_error = |message: String| CertFileError::X509ParseError {
        path: path.display().to_string(),
        message,
    };

    let (subject, issuer, serial, validity, is_self_signed) = {
        let (rest, cert) =
            X509Certificate::from_der(&der).map_err(|e| parse_error(e.to_string()))?;
        if !rest.is_empty() {
            return Err(parse_error(format!(
                "{} trailing bytes after certificate",
                rest.len()
            )));
        }
        (
            cert.subject().to_string(),
            cert.issuer().to_string(),
            hex_colon(&cert.serial.to_bytes_be()),
            (cert.validity().not_before, cert.validity().not_after),
            cert.subject() == cert.issuer(),
        )
    };

    let not_before = asn1_time_to_datetime(validity.0).ok_or_else(|| {
        parse_error("invalid notBefore timestamp in certificate".to_string())
    })?;
    let not_after = asn1_time_to_datetime(validity.1)
        .ok_or_else(|| parse_error("invalid notAfter timestamp in certificate".to_string()))?;
    let fingerprint = hex_colon(&sha2::Sha256::digest(&der));

    Ok(Certificate {
        subject,
        issuer,
        serial,
        not_before,
        not_after,
        is_self_signed,
        fingerprint,
        der,
    })
}

fn asn1_time_to_datetime(time: ASN1Time) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(time.timestamp(), 0).single()
}

fn hex_colon(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
