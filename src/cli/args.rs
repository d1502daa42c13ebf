//! CLI argument definitions using clap

use crate::cert_ops::PemBlockPolicy;
use crate::config::{self, Settings};
use crate::utils::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Package a root, intermediate and leaf certificate into a PKCS#12 file
/// with no private key and an empty password.
///
/// With no arguments, reads root.crt, intermediate.crt and final.crt from the
/// current directory and writes cert_chain_no_key.p12.
#[derive(Parser, Debug)]
#[command(name = "p12-chain")]
#[command(version)]
#[command(about = "Package a PEM certificate chain as a key-less PKCS#12 file", long_about)]
pub struct Cli {
    /// Root certificate (default: root.crt)
    #[arg(long, value_name = "FILE")]
    pub root: Option<PathBuf>,

    /// Intermediate certificate; repeat for longer chains, leaf side first
    /// (default: intermediate.crt)
    #[arg(long = "intermediate", value_name = "FILE")]
    pub intermediates: Vec<PathBuf>,

    /// Leaf certificate (default: final.crt)
    #[arg(long, value_name = "FILE")]
    pub leaf: Option<PathBuf>,

    /// Output file (default: cert_chain_no_key.p12)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reject input files holding more than one PEM block
    #[arg(long)]
    pub strict_pem: bool,

    /// Read the written file back and compare it with the inputs
    #[arg(long)]
    pub verify: bool,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `settings`
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(root) = &self.root {
            settings.inputs.root = root.clone();
        }
        if !self.intermediates.is_empty() {
            settings.inputs.intermediates = self.intermediates.clone();
        }
        if let Some(leaf) = &self.leaf {
            settings.inputs.leaf = leaf.clone();
        }
        if let Some(output) = &self.output {
            settings.output.path = output.clone();
        }
        if self.strict_pem {
            settings.pem.policy = PemBlockPolicy::Strict;
        }
        if self.verify {
            settings.verify_output = true;
        }
    }

    /// Resolve the effective settings: config file (if any), then flags
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = config::load_config(self.config.as_deref())?;
        self.apply_to(&mut settings);
        settings.validate()?;
        Ok(settings)
    }
}
