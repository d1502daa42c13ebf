//! JSON output formatter

use crate::models::{Certificate, ChainRole};
use crate::runner::PipelineReport;
use crate::utils::ToolkitError;
use serde::Serialize;

/// One packaged certificate
#[derive(Serialize)]
pub struct JsonCertificate<'a> {
    pub role: ChainRole,
    /// PEM blocks after the first one in the source file
    pub ignored_blocks: usize,
    #[serde(flatten)]
    pub certificate: &'a Certificate,
}

/// JSON-serializable report of a successful run
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub output: String,
    pub bytes: usize,
    pub verified: bool,
    pub certificates: Vec<JsonCertificate<'a>>,
}

impl<'a> From<&'a PipelineReport> for JsonOutput<'a> {
    fn from(report: &'a PipelineReport) -> Self {
        Self {
            output: report.output.display().to_string(),
            bytes: report.bytes,
            verified: report.verified,
            certificates: report
                .chain
                .roles()
                .enumerate()
                .map(|(i, (role, certificate))| JsonCertificate {
                    role,
                    ignored_blocks: report.ignored_blocks.get(i).copied().unwrap_or_default(),
                    certificate,
                })
                .collect(),
        }
    }
}

/// JSON-serializable failure
#[derive(Serialize)]
pub struct JsonError {
    pub error: String,
    pub stage: Option<&'static str>,
    pub exit_code: u8,
}

impl From<&ToolkitError> for JsonError {
    fn from(err: &ToolkitError) -> Self {
        Self {
            error: err.to_string(),
            stage: err.stage().map(|s| s.name()),
            exit_code: err.exit_code(),
        }
    }
}

/// Print a report as pretty JSON to stdout
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
