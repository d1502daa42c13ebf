//! Certificate chain assembly
//!
//! Orders certificates leaf-first. Ordering is positional: issuer/subject
//! linkage and signatures are not checked.

use crate::models::{Certificate, ChainRole};

/// Leaf-first certificate chain: leaf, zero or more intermediates, root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certificates: Vec<Certificate>,
}

/// Order three certificates as `[leaf, intermediate, root]`
pub fn assemble(
    root: Certificate,
    intermediate: Certificate,
    leaf: Certificate,
) -> CertificateChain {
    CertificateChain::from_parts(leaf, vec![intermediate], root)
}

impl CertificateChain {
    /// Build a chain from its parts. `intermediates` are ordered starting
    /// with the one closest to the leaf.
    pub fn from_parts(
        leaf: Certificate,
        intermediates: Vec<Certificate>,
        root: Certificate,
    ) -> Self {
        let mut certificates = Vec::with_capacity(intermediates.len() + 2);
        certificates.push(leaf);
        certificates.extend(intermediates);
        certificates.push(root);
        Self { certificates }
    }

    pub fn leaf(&self) -> &Certificate {
        &self.certificates[0]
    }

    pub fn root(&self) -> &Certificate {
        &self.certificates[self.certificates.len() - 1]
    }

    pub fn intermediates(&self) -> &[Certificate] {
        &self.certificates[1..self.certificates.len() - 1]
    }

    /// Everything after the leaf, intermediates first and root last
    pub fn ca_certificates(&self) -> &[Certificate] {
        &self.certificates[1..]
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Always false: a chain holds at least a leaf and a root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter()
    }

    /// Each certificate paired with its position in the chain
    pub fn roles(&self) -> impl Iterator<Item = (ChainRole, &Certificate)> {
        let last = self.certificates.len() - 1;
        self.certificates.iter().enumerate().map(move |(i, cert)| {
            let role = if i == 0 {
                ChainRole::Leaf
            } else if i == last {
                ChainRole::Root
            } else {
                ChainRole::Intermediate
            };
            (role, cert)
        })
    }

    /// DER encodings in chain order
    pub fn ders(&self) -> Vec<&[u8]> {
        self.certificates.iter().map(Certificate::der).collect()
    }
}
