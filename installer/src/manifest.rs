//! Append installed paths to the shared vendor manifest.
//!
//! The manifest is owned by the calling vendoring tool; this module only ever
//! appends to it.

use crate::error::{InstallerError, Result};
use crate::install::InstalledFileRecord;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::OpenOptions;
use std::io::Write;

/// What happened to the manifest during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    /// Recording is not enabled for this run.
    Disabled,
    /// Records were appended.
    Appended {
        /// The manifest file.
        path: Utf8PathBuf,
        /// Number of lines appended.
        count: usize,
    },
}

/// Append one line per record to the manifest at `manifest_path`.
///
/// Does nothing, and creates nothing, when `manifest_path` is `None`. The
/// file and its parent directory are created when absent.
///
/// # Errors
///
/// Returns [`InstallerError::Manifest`] if the manifest cannot be created or
/// written.
///
/// # Examples
///
/// ```
/// use git_dogfood_installer::manifest::{append_records, ManifestOutcome};
///
/// let outcome = append_records(None, &[])?;
/// assert_eq!(outcome, ManifestOutcome::Disabled);
/// # Ok::<(), git_dogfood_installer::error::InstallerError>(())
/// ```
pub fn append_records(
    manifest_path: Option<&Utf8Path>,
    records: &[InstalledFileRecord],
) -> Result<ManifestOutcome> {
    let Some(path) = manifest_path else {
        log::debug!("manifest recording disabled");
        return Ok(ManifestOutcome::Disabled);
    };

    let to_error = |source| InstallerError::Manifest {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }

    let body: String = records
        .iter()
        .map(|record| format!("{record}\n"))
        .collect();

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)?;
    file.write_all(body.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)?;

    log::debug!("appended {} record(s) to {path}", records.len());
    Ok(ManifestOutcome::Appended {
        path: path.to_owned(),
        count: records.len(),
    })
}
