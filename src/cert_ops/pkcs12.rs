//! PKCS#12 container encoding
//!
//! Packages a certificate chain as trusted-certificate entries with no
//! private key, and reads such containers back.

use crate::cert_ops::chain::CertificateChain;
use crate::utils::CertFileError;
use std::collections::BTreeMap;

/// The only password this tool writes or reads containers with
pub const EMPTY_PASSWORD: &str = "";

/// Aliases for every chain position, leaf first.
///
/// The keystore orders entries by alias, so each alias starts with a
/// zero-padded position: `00-leaf`, `01-intermediate-1`, ..., `NN-root`.
pub fn entry_aliases(chain_len: usize) -> Vec<String> {
    let last = chain_len.saturating_sub(1);
    let width = last.to_string().len().max(2);
    (0..chain_len)
        .map(|i| {
            if i == 0 {
                format!("{:0width$}-leaf", i, width = width)
            } else if i == last {
                format!("{:0width$}-root", i, width = width)
            } else {
                format!("{:0width$}-intermediate-{}", i, i, width = width)
            }
        })
        .collect()
}

/// Position encoded in an alias written by [`entry_aliases`]
fn alias_position(alias: &str) -> Option<usize> {
    alias.split_once('-')?.0.parse().ok()
}

/// Certificates recovered from a container, in chain order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerContents {
    pub leaf: Vec<u8>,
    /// Intermediates then root
    pub ca_certificates: Vec<Vec<u8>>,
    pub has_private_key: bool,
}

/// Encode `chain` as a key-less PKCS#12 container.
///
/// Salts and IVs are drawn from the keystore library's CSPRNG, so two
/// encodings of the same chain differ byte-wise.
pub fn encode_chain(chain: &CertificateChain, password: &str) -> Result<Vec<u8>, CertFileError> {
    let mut keystore = p12_keystore::KeyStore::new();

    let to_entry = |der: &[u8]| {
        p12_keystore::Certificate::from_der(der)
            .map(p12_keystore::KeyStoreEntry::Certificate)
            .map_err(|e| CertFileError::Pkcs12EncodeError {
                message: format!("Failed to load certificate for PKCS#12: {}", e),
            })
    };

    for (alias, cert) in entry_aliases(chain.len()).iter().zip(chain.iter()) {
        keystore.add_entry(alias, to_entry(cert.der())?);
    }

    let data = keystore
        .writer(password)
        .write()
        .map_err(|e| CertFileError::Pkcs12EncodeError {
            message: format!("Failed to serialize PKCS#12: {}", e),
        })?;

    tracing::debug!(
        certificates = chain.len(),
        bytes = data.len(),
        "encoded PKCS#12 container"
    );
    Ok(data)
}

/// Decode a container written by [`encode_chain`]
pub fn read_container(data: &[u8], password: &str) -> Result<ContainerContents, CertFileError> {
    let keystore = p12_keystore::KeyStore::from_pkcs12(data, password).map_err(|e| {
        CertFileError::Pkcs12DecodeError {
            message: format!("Failed to parse PKCS#12: {}", e),
        }
    })?;

    let mut by_position = BTreeMap::new();
    let mut has_private_key = false;

    for (alias, entry) in keystore.entries() {
        match entry {
            p12_keystore::KeyStoreEntry::PrivateKeyChain(_) => has_private_key = true,
            p12_keystore::KeyStoreEntry::Certificate(cert) => {
                let position = alias_position(alias).ok_or_else(|| {
                    CertFileError::Pkcs12DecodeError {
                        message: format!("Unexpected certificate entry '{}'", alias),
                    }
                })?;
                by_position.insert(position, (alias.to_string(), cert.as_der().to_vec()));
            }
        }
    }

    let expected = entry_aliases(by_position.len());
    if by_position.len() < 2 {
        return Err(CertFileError::Pkcs12DecodeError {
            message: format!(
                "expected at least 2 certificate entries, found {}",
                by_position.len()
            ),
        });
    }
    for ((position, (alias, _)), wanted) in by_position.iter().zip(&expected) {
        if alias != wanted {
            return Err(CertFileError::Pkcs12DecodeError {
                message: format!(
                    "entry {} is named '{}', expected '{}'",
                    position, alias, wanted
                ),
            });
        }
    }

    let mut ders = by_position.into_values().map(|(_, der)| der);
    let leaf = ders.next().unwrap_or_default();
    let ca_certificates: Vec<Vec<u8>> = ders.collect();

    Ok(ContainerContents {
        leaf,
        ca_certificates,
        has_private_key,
    })
}

/// Check that `data` decodes to exactly `chain` and holds no private key.
///
/// `path` is only used for error messages.
pub fn verify_container(
    data: &[u8],
    chain: &CertificateChain,
    path: &str,
) -> Result<(), CertFileError> {
    let contents = read_container(data, EMPTY_PASSWORD)?;
    let mismatch = |message: String| CertFileError::VerificationFailed {
        path: path.to_string(),
        message,
    };

    if contents.has_private_key {
        return Err(mismatch("container holds a private key entry".to_string()));
    }
    if contents.leaf != chain.leaf().der() {
        return Err(mismatch("leaf certificate differs".to_string()));
    }
    if contents.ca_certificates.len() != chain.ca_certificates().len() {
        return Err(mismatch(format!(
            "expected {} CA certificates, found {}",
            chain.ca_certificates().len(),
            contents.ca_certificates.len()
        )));
    }
    for (i, (found, expected)) in contents
        .ca_certificates
        .iter()
        .zip(chain.ca_certificates())
        .enumerate()
    {
        if found.as_slice() != expected.der() {
            return Err(mismatch(format!(
                "CA certificate #{} ({}) differs",
                i + 1,
                expected.subject
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert_ops::chain::assemble;
    use crate::cert_ops::reader::{load_certificate, PemBlockPolicy};
    use crate::models::Certificate;
    use std::path::Path;

    fn fixture(name: &str) -> Certificate {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name);
        load_certificate(&path, PemBlockPolicy::FirstBlock)
            .unwrap()
            .certificate
    }

    fn fixture_chain() -> CertificateChain {
        assemble(
            fixture("root.crt"),
            fixture("intermediate.crt"),
            fixture("final.crt"),
        )
    }

    #[test]
    fn test_round_trip_preserves_der_and_order() {
        let chain = fixture_chain();
        let data = encode_chain(&chain, EMPTY_PASSWORD).unwrap();
        assert!(!data.is_empty());

        let contents = read_container(&data, EMPTY_PASSWORD).unwrap();
        assert_eq!(contents.leaf, chain.leaf().der());
        assert_eq!(
            contents.ca_certificates,
            vec![
                chain.intermediates()[0].der().to_vec(),
                chain.root().der().to_vec()
            ]
        );
        assert!(!contents.has_private_key);
    }

    #[test]
    fn test_round_trip_without_intermediates() {
        let chain =
            CertificateChain::from_parts(fixture("final.crt"), vec![], fixture("root.crt"));
        let data = encode_chain(&chain, EMPTY_PASSWORD).unwrap();
        let contents = read_container(&data, EMPTY_PASSWORD).unwrap();
        assert_eq!(contents.ca_certificates.len(), 1);
        assert_eq!(contents.ca_certificates[0], chain.root().der());
    }

    #[test]
    fn test_unrelated_certificates_encode() {
        let chain = assemble(
            fixture("unrelated-1.crt"),
            fixture("unrelated-2.crt"),
            fixture("unrelated-3.crt"),
        );
        let data = encode_chain(&chain, EMPTY_PASSWORD).unwrap();
        verify_container(&data, &chain, "out.p12").unwrap();
    }

    #[test]
    fn test_verify_detects_different_chain() {
        let chain = fixture_chain();
        let data = encode_chain(&chain, EMPTY_PASSWORD).unwrap();
        let other = assemble(
            fixture("root.crt"),
            fixture("unrelated-2.crt"),
            fixture("final.crt"),
        );
        let err = verify_container(&data, &other, "out.p12").unwrap_err();
        assert!(matches!(err, CertFileError::VerificationFailed { .. }));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = read_container(b"definitely not pkcs12", EMPTY_PASSWORD).unwrap_err();
        assert!(matches!(err, CertFileError::Pkcs12DecodeError { .. }));
    }

    #[test]
    fn test_aliases_sort_in_chain_order() {
        assert_eq!(
            entry_aliases(3),
            ["00-leaf", "01-intermediate-1", "02-root"]
        );
        let aliases = entry_aliases(13);
        assert_eq!(aliases[0], "00-leaf");
        assert_eq!(aliases[10], "10-intermediate-10");
        assert_eq!(aliases[12], "12-root");
        let mut sorted = aliases.clone();
        sorted.sort();
        assert_eq!(sorted, aliases);

        let wide = entry_aliases(101);
        assert_eq!(wide[2], "002-intermediate-2");
        assert_eq!(wide[100], "100-root");
    }

    fn stored_order(data: &[u8]) -> Vec<Vec<u8>> {
        let keystore = p12_keystore::KeyStore::from_pkcs12(data, EMPTY_PASSWORD).unwrap();
        keystore
            .entries()
            .map(|(_, entry)| match entry {
                p12_keystore::KeyStoreEntry::Certificate(cert) => cert.as_der().to_vec(),
                p12_keystore::KeyStoreEntry::PrivateKeyChain(_) => panic!("unexpected key entry"),
            })
            .collect()
    }

    #[test]
    fn test_entries_stored_leaf_first() {
        let chain = fixture_chain();
        let data = encode_chain(&chain, EMPTY_PASSWORD).unwrap();
        let expected: Vec<Vec<u8>> = chain.iter().map(|c| c.der().to_vec()).collect();
        assert_eq!(stored_order(&data), expected);
    }

    #[test]
    fn test_entries_stored_in_order_with_many_intermediates() {
        let pool = [
            "intermediate.crt",
            "unrelated-1.crt",
            "unrelated-2.crt",
            "unrelated-3.crt",
        ];
        let intermediates: Vec<Certificate> =
            (0..11).map(|i| fixture(pool[i % pool.len()])).collect();
        let chain = CertificateChain::from_parts(
            fixture("final.crt"),
            intermediates,
            fixture("root.crt"),
        );
        assert_eq!(chain.len(), 13);

        let data = encode_chain(&chain, EMPTY_PASSWORD).unwrap();
        let expected: Vec<Vec<u8>> = chain.iter().map(|c| c.der().to_vec()).collect();
        assert_eq!(stored_order(&data), expected);

        let contents = read_container(&data, EMPTY_PASSWORD).unwrap();
        assert_eq!(contents.leaf, expected[0]);
        assert_eq!(contents.ca_certificates, expected[1..].to_vec());
    }
}
