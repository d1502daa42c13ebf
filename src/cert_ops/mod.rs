//! Certificate file operations module
//!
//! The packaging pipeline stages: load PEM certificates, assemble them into
//! a chain, encode the chain as PKCS#12, and write the container out.

pub mod chain;
pub mod pkcs12;
pub mod reader;
pub mod writer;

pub use chain::{assemble, CertificateChain};
pub use pkcs12::{encode_chain, read_container, verify_container, ContainerContents, EMPTY_PASSWORD};
pub use reader::{decode_certificate, load_certificate, LoadedCertificate, PemBlockPolicy};
pub use writer::write_container;
