//! p12-chain - package a PEM certificate chain as a key-less PKCS#12 file
//!
//! Reads a root, intermediate and leaf certificate, orders them leaf-first,
//! and writes them to a PKCS#12 container with an empty password.

use clap::Parser;
use p12_chain::output::{self, JsonError, JsonOutput};
use p12_chain::runner::{self, PipelineEvent};
use p12_chain::{Cli, Result};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                // Nothing else can be reported if serializing the error fails
                let _ = output::print_json(&JsonError::from(&e));
            } else {
                output::print_error(&e.to_string());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = cli.settings()?;
    tracing::debug!(?settings, "resolved settings");

    let json = cli.json;
    let verbose = cli.verbose;
    let report = runner::run_pipeline(&settings, &|event| match event {
        PipelineEvent::Loaded {
            path,
            ignored_blocks,
            ..
        } if ignored_blocks > 0 && !json => {
            output::print_warning(&format!(
                "{} holds {} PEM blocks; only the first was used",
                path.display(),
                ignored_blocks + 1
            ));
        }
        PipelineEvent::Encoded { bytes } if verbose && !json => {
            output::print_info(&format!("Encoded {} bytes", bytes));
        }
        PipelineEvent::Verified { path } if verbose && !json => {
            output::print_info(&format!("Verified {}", path.display()));
        }
        _ => {}
    })?;

    if json {
        if let Err(e) = output::print_json(&JsonOutput::from(&report)) {
            tracing::error!(error = %e, "failed to serialize report");
        }
        return Ok(());
    }

    if verbose {
        output::print_chain_summary(&report.chain);
    }
    output::print_success("PKCS#12 file created successfully!");

    Ok(())
}
