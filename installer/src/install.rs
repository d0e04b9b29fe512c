//! Idempotent installation of the planned artefacts.
//!
//! The installer works in two phases. First every artefact is checked
//! against its [`InstallPolicy`] and the content of each file that will be
//! written is obtained, so a fetch failure aborts the run before anything
//! touches the filesystem. Then the install directory is created and the
//! files are written in plan order.

use crate::artefact::{Artefact, ArtefactSource, InstallPolicy, plan_artefacts};
use crate::atomic_write::{install_permissions, write_atomically};
use crate::config::InstallConfig;
use crate::error::{InstallerError, Result};
use crate::output::{installed_message, skip_notice, write_line};
use crate::transport::Transport;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::io::Write;

/// Path of a file written by this run, relative to the consumer root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstalledFileRecord(String);

impl InstalledFileRecord {
    /// Create a record for `relative_path`.
    #[must_use]
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self(relative_path.into())
    }

    /// The recorded path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstalledFileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of an installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    installed: Vec<InstalledFileRecord>,
    skipped: Vec<String>,
}

impl InstallReport {
    /// Files written by this run, in installation order.
    #[must_use]
    pub fn installed(&self) -> &[InstalledFileRecord] {
        &self.installed
    }

    /// Relative paths left untouched because they already existed.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

/// A file whose content is ready to be written.
struct PendingWrite {
    artefact: Artefact,
    destination: Utf8PathBuf,
    bytes: Vec<u8>,
}

/// Install the artefacts planned for `config`.
///
/// Progress lines, including the skip notice for artefacts that already
/// exist, are written to `out`.
///
/// # Errors
///
/// Returns [`InstallerError::Fetch`] if any remote artefact cannot be
/// fetched (nothing is written in that case) and
/// [`InstallerError::Filesystem`] if a directory or file cannot be written.
pub fn install(
    config: &InstallConfig,
    transport: &dyn Transport,
    out: &mut dyn Write,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    let mut pending = Vec::new();

    for artefact in plan_artefacts(config) {
        let destination = artefact.destination(&config.root);
        if artefact.policy() == InstallPolicy::SkipIfExists && path_is_occupied(&destination) {
            log::debug!("{destination} exists; leaving it untouched");
            write_line(out, skip_notice(artefact.relative_path()));
            report.skipped.push(artefact.relative_path().to_owned());
            continue;
        }

        let bytes = artefact_contents(&artefact, config, transport)?;
        pending.push(PendingWrite {
            artefact,
            destination,
            bytes,
        });
    }

    create_dir(&config.install_dir_path())?;

    for write in pending {
        write_artefact(&write)?;
        write_line(out, installed_message(write.artefact.relative_path()));
        report
            .installed
            .push(InstalledFileRecord::new(write.artefact.relative_path()));
    }

    Ok(report)
}

/// Obtain the bytes an artefact should be written with.
fn artefact_contents(
    artefact: &Artefact,
    config: &InstallConfig,
    transport: &dyn Transport,
) -> Result<Vec<u8>> {
    match artefact.source() {
        ArtefactSource::Remote(remote_path) => {
            log::debug!(
                "fetching {remote_path} from {}@{} via {}",
                config.repo,
                config.git_ref,
                transport.kind()
            );
            let fetched = transport.fetch(&config.repo, &config.git_ref, remote_path)?;
            log::trace!(
                "fetched {} ({} bytes)",
                fetched.remote_path(),
                fetched.bytes().len()
            );
            Ok(fetched.into_bytes())
        }
        ArtefactSource::Inline(bytes) => Ok(bytes.clone()),
    }
}

fn write_artefact(write: &PendingWrite) -> Result<()> {
    if let Some(parent) = write.destination.parent() {
        create_dir(parent)?;
    }

    let permissions = install_permissions(write.artefact.executable());
    write_atomically(&write.destination, &write.bytes, permissions).map_err(|source| {
        InstallerError::Filesystem {
            path: write.destination.clone(),
            source,
        }
    })?;
    log::debug!("wrote {} bytes to {}", write.bytes.len(), write.destination);
    Ok(())
}

/// Create `dir` and its parents; an existing directory is not an error.
fn create_dir(dir: &Utf8Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| InstallerError::Filesystem {
        path: dir.to_owned(),
        source,
    })
}

/// True when anything (file, directory or symlink) occupies `path`.
fn path_is_occupied(path: &Utf8Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
