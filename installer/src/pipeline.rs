//! Installation pipeline orchestration.
//!
//! Coordinates the installer, manifest recorder and registry updater for one
//! run and prints progress lines as each stage completes.

use crate::config::{InstallConfig, Protocol};
use crate::error::Result;
use crate::install::{InstallReport, install};
use crate::manifest::{ManifestOutcome, append_records};
use crate::output::{manifest_message, start_message, success_message, write_line};
use crate::registry::{
    RegistryOutcome, TOOL_NAME, VendorRegistryEntry, merge_registry, registry_path,
};
use crate::transport::Transport;
use std::io::Write;

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files installed and skipped.
    pub install: InstallReport,
    /// Manifest recording result.
    pub manifest: ManifestOutcome,
    /// Vendor registry result. Always [`RegistryOutcome::Skipped`] under the
    /// environment protocol.
    pub registry: RegistryOutcome,
}

/// Run a full installation.
///
/// Installs the artefacts, appends the installed paths to the manifest when
/// one is configured and, for legacy invocations, registers the tool in the
/// shared vendor registry.
///
/// # Errors
///
/// Returns the first error raised by any stage. Stages after the failing one
/// do not run.
pub fn run(
    config: &InstallConfig,
    transport: &dyn Transport,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    write_line(out, start_message(config));

    let report = install(config, transport, out)?;

    let manifest = append_records(config.manifest_path.as_deref(), report.installed())?;
    if let ManifestOutcome::Appended { path, count } = &manifest {
        write_line(out, manifest_message(*count, path.as_str()));
    }

    let registry = register_vendor(config, out)?;

    write_line(
        out,
        success_message(&config.git_ref, config.install_dir.as_str()),
    );

    Ok(RunSummary {
        install: report,
        manifest,
        registry,
    })
}

fn register_vendor(config: &InstallConfig, out: &mut dyn Write) -> Result<RegistryOutcome> {
    if config.protocol != Protocol::Legacy {
        log::debug!(
            "registry updates are owned by the caller under the {} protocol",
            config.protocol
        );
        return Ok(RegistryOutcome::Skipped);
    }

    let entry = VendorRegistryEntry::for_install(config);
    let outcome = merge_registry(&registry_path(&config.root), &entry)?;
    if let RegistryOutcome::Updated { path } = &outcome {
        write_line(out, format!("Registered {TOOL_NAME} in {path}"));
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
