//! Packaging pipeline
//!
//! Runs load → assemble → encode → write as a single forward pass. The
//! first failure stops the run; nothing is written unless every certificate
//! loaded and the container encoded.

use crate::cert_ops::{self, CertificateChain, LoadedCertificate, PemBlockPolicy, EMPTY_PASSWORD};
use crate::config::Settings;
use crate::models::Certificate;
use crate::utils::{CertFileError, Result, Stage, ToolkitError};
use std::path::{Path, PathBuf};

/// Events emitted while the pipeline runs
pub enum PipelineEvent<'a> {
    Loaded {
        stage: Stage,
        path: &'a Path,
        certificate: &'a Certificate,
        ignored_blocks: usize,
    },
    Encoded {
        bytes: usize,
    },
    Written {
        path: &'a Path,
    },
    Verified {
        path: &'a Path,
    },
}

/// Outcome of a successful run
#[derive(Debug)]
pub struct PipelineReport {
    pub output: PathBuf,
    pub bytes: usize,
    pub verified: bool,
    pub chain: CertificateChain,
    /// PEM blocks skipped per input file, in chain order
    pub ignored_blocks: Vec<usize>,
}

/// Certificates read from the configured inputs
#[derive(Debug)]
pub struct LoadedChain {
    pub chain: CertificateChain,
    /// PEM blocks skipped per input file, leaf first like `chain`
    pub ignored_blocks: Vec<usize>,
}

fn load(
    path: &Path,
    stage: Stage,
    policy: PemBlockPolicy,
    on_event: &dyn Fn(PipelineEvent),
) -> Result<LoadedCertificate> {
    let loaded = cert_ops::load_certificate(path, policy).map_err(ToolkitError::at(stage))?;
    tracing::debug!(
        path = %path.display(),
        subject = %loaded.certificate.subject,
        "loaded certificate"
    );
    on_event(PipelineEvent::Loaded {
        stage,
        path,
        certificate: &loaded.certificate,
        ignored_blocks: loaded.ignored_blocks,
    });
    Ok(loaded)
}

/// Load the configured certificates, in root, intermediates, leaf order
pub fn load_chain(settings: &Settings, on_event: &dyn Fn(PipelineEvent)) -> Result<LoadedChain> {
    let policy = settings.pem.policy;
    let inputs = &settings.inputs;

    let root = load(&inputs.root, Stage::LoadRoot, policy, on_event)?;
    let intermediates = inputs
        .intermediates
        .iter()
        .enumerate()
        .map(|(i, path)| load(path, Stage::LoadIntermediate(i), policy, on_event))
        .collect::<Result<Vec<_>>>()?;
    let leaf = load(&inputs.leaf, Stage::LoadLeaf, policy, on_event)?;

    let ignored_blocks = std::iter::once(leaf.ignored_blocks)
        .chain(intermediates.iter().map(|i| i.ignored_blocks))
        .chain(std::iter::once(root.ignored_blocks))
        .collect();
    let chain = CertificateChain::from_parts(
        leaf.certificate,
        intermediates.into_iter().map(|i| i.certificate).collect(),
        root.certificate,
    );

    Ok(LoadedChain {
        chain,
        ignored_blocks,
    })
}

/// Run the whole pipeline described by `settings`
pub fn run_pipeline(settings: &Settings, on_event: &dyn Fn(PipelineEvent)) -> Result<PipelineReport> {
    let LoadedChain {
        chain,
        ignored_blocks,
    } = load_chain(settings, on_event)?;

    let data =
        cert_ops::encode_chain(&chain, EMPTY_PASSWORD).map_err(ToolkitError::at(Stage::Encode))?;
    on_event(PipelineEvent::Encoded { bytes: data.len() });

    let output = settings.output.path.as_path();
    cert_ops::write_container(output, &data, settings.output.mode)
        .map_err(ToolkitError::at(Stage::Write))?;
    on_event(PipelineEvent::Written { path: output });
    tracing::info!(path = %output.display(), certificates = chain.len(), "PKCS#12 file written");

    if settings.verify_output {
        verify_written(output, &chain).map_err(ToolkitError::at(Stage::Verify))?;
        on_event(PipelineEvent::Verified { path: output });
    }

    Ok(PipelineReport {
        output: output.to_path_buf(),
        bytes: data.len(),
        verified: settings.verify_output,
        chain,
        ignored_blocks,
    })
}

fn verify_written(path: &Path, chain: &CertificateChain) -> std::result::Result<(), CertFileError> {
    let data = std::fs::read(path).map_err(|e| CertFileError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    cert_ops::verify_container(&data, chain, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert_ops::read_container;
    use std::cell::RefCell;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn settings_in(dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.inputs.root = fixture("root.crt");
        settings.inputs.intermediates = vec![fixture("intermediate.crt")];
        settings.inputs.leaf = fixture("final.crt");
        settings.output.path = dir.join("cert_chain_no_key.p12");
        settings
    }

    #[test]
    fn test_pipeline_writes_decodable_container() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());

        let report = run_pipeline(&settings, &|_| {}).unwrap();
        let data = std::fs::read(&report.output).unwrap();
        assert_eq!(data.len(), report.bytes);

        let contents = read_container(&data, EMPTY_PASSWORD).unwrap();
        assert_eq!(contents.leaf, report.chain.leaf().der());
        assert_eq!(contents.ca_certificates.len(), 2);
        assert!(!report.verified);
    }

    #[test]
    fn test_pipeline_with_verification() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.verify_output = true;

        let report = run_pipeline(&settings, &|_| {}).unwrap();
        assert!(report.verified);
    }

    #[test]
    fn test_missing_intermediate_stops_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.inputs.intermediates = vec![dir.path().join("intermediate.crt")];

        let err = run_pipeline(&settings, &|_| {}).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::LoadIntermediate(0)));
        assert!(err.to_string().contains("intermediate.crt"));
        assert!(!settings.output.path.exists());
    }

    #[test]
    fn test_events_follow_stage_order() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let seen = RefCell::new(Vec::new());

        run_pipeline(&settings, &|event| {
            let label = match event {
                PipelineEvent::Loaded { stage, .. } => stage.name(),
                PipelineEvent::Encoded { .. } => "encoded",
                PipelineEvent::Written { .. } => "written",
                PipelineEvent::Verified { .. } => "verified",
            };
            seen.borrow_mut().push(label);
        })
        .unwrap();

        assert_eq!(
            seen.into_inner(),
            ["load-root", "load-intermediate", "load-leaf", "encoded", "written"]
        );
    }

    #[test]
    fn test_strict_policy_rejects_bundle_as_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.inputs.leaf = fixture("bundle.crt");
        settings.pem.policy = PemBlockPolicy::Strict;

        let err = run_pipeline(&settings, &|_| {}).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::LoadLeaf));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_report_counts_ignored_blocks_in_chain_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.inputs.leaf = fixture("bundle.crt");

        let report = run_pipeline(&settings, &|_| {}).unwrap();
        assert_eq!(report.ignored_blocks, [1, 0, 0]);
        assert_eq!(report.ignored_blocks.len(), report.chain.len());
    }

    #[test]
    fn test_unwritable_output_is_write_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(dir.path());
        settings.output.path = dir.path().join("missing").join("out.p12");

        let err = run_pipeline(&settings, &|_| {}).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Write));
        assert_eq!(err.exit_code(), 7);
    }
}
