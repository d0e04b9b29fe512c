//! Merge this tool's entry into the shared vendor registry.
//!
//! Consumers that vendor several tools keep a JSON registry at
//! `.vendored/config.json`. Legacy installs register themselves there under
//! `vendors["git-dogfood"]` so that update tooling knows which paths belong
//! to this tool. The registry is never created by the installer, and every
//! other key in it is preserved in its original order.

use crate::artefact::{WORKFLOW_PATH, install_dir_entry};
use crate::atomic_write::write_atomically;
use crate::config::InstallConfig;
use crate::error::{InstallerError, Result};
use crate::repo_slug::RepoSlug;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;

/// Registry location relative to the consumer root.
pub const REGISTRY_RELATIVE_PATH: &str = ".vendored/config.json";
/// Key this tool is registered under.
pub const TOOL_NAME: &str = "git-dogfood";
/// Branch update tooling uses for install pull requests.
pub const INSTALL_BRANCH: &str = "chore/install-git-dogfood";

const VENDORS_KEY: &str = "vendors";

/// The registry entry describing this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorRegistryEntry {
    /// Source repository.
    pub repo: RepoSlug,
    /// Branch used for install pull requests.
    pub install_branch: String,
    /// Path globs owned by this tool.
    pub protected: Vec<String>,
}

impl VendorRegistryEntry {
    /// Build the entry for the install described by `config`.
    #[must_use]
    pub fn for_install(config: &InstallConfig) -> Self {
        Self {
            repo: config.repo.clone(),
            install_branch: INSTALL_BRANCH.to_owned(),
            protected: vec![
                install_dir_entry(&config.install_dir, "**"),
                WORKFLOW_PATH.to_owned(),
            ],
        }
    }
}

/// What happened to the registry during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOutcome {
    /// No registry exists; nothing was written.
    Skipped,
    /// The registry was rewritten with the merged entry.
    Updated {
        /// The registry file.
        path: Utf8PathBuf,
    },
}

/// Path of the registry under `root`.
#[must_use]
pub fn registry_path(root: &Utf8Path) -> Utf8PathBuf {
    root.join(REGISTRY_RELATIVE_PATH)
}

/// Merge `entry` into the registry at `path`.
///
/// A missing registry is skipped. An existing one is parsed, merged and
/// replaced atomically, keeping its permissions. When `path` is a symlink the
/// file it points to is replaced and the link itself is left in place.
///
/// # Errors
///
/// Returns [`InstallerError::RegistryParse`] when the file is not a JSON
/// object with an object-valued `vendors` key (the file is left untouched),
/// [`InstallerError::Filesystem`] when it cannot be read, and
/// [`InstallerError::RegistryWrite`] when the merged document cannot be
/// written back.
pub fn merge_registry(path: &Utf8Path, entry: &VendorRegistryEntry) -> Result<RegistryOutcome> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("no vendor registry at {path}; skipping registration");
            return Ok(RegistryOutcome::Skipped);
        }
        Err(source) => {
            return Err(InstallerError::Filesystem {
                path: path.to_owned(),
                source,
            });
        }
    };

    let parse_error = |reason: String| InstallerError::RegistryParse {
        path: path.to_owned(),
        reason,
    };
    let document: Value = serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
    let merged = merge_document(document, entry).map_err(parse_error)?;

    let mut rendered =
        serde_json::to_string_pretty(&merged).map_err(|e| parse_error(e.to_string()))?;
    rendered.push('\n');

    let write_error = |source| InstallerError::RegistryWrite {
        path: path.to_owned(),
        source,
    };
    // A symlinked registry is updated at its target and the link is kept.
    let target = std::fs::canonicalize(path).map_err(write_error)?;
    let target = Utf8PathBuf::try_from(target).map_err(|e| write_error(e.into_io_error()))?;
    let permissions = std::fs::metadata(&target).map_err(write_error)?.permissions();
    write_atomically(&target, rendered.as_bytes(), Some(permissions)).map_err(write_error)?;

    log::debug!("registered {TOOL_NAME} in {path}");
    Ok(RegistryOutcome::Updated {
        path: path.to_owned(),
    })
}

/// Insert or replace this tool's entry in a parsed registry document.
///
/// # Errors
///
/// Returns a description of the problem when the document is not an object
/// or its `vendors` value is not an object.
///
/// # Examples
///
/// ```
/// use git_dogfood_installer::registry::{merge_document, VendorRegistryEntry};
/// use git_dogfood_installer::repo_slug::RepoSlug;
/// use serde_json::json;
///
/// let entry = VendorRegistryEntry {
///     repo: RepoSlug::try_from("o/gd")?,
///     install_branch: "chore/install-git-dogfood".to_owned(),
///     protected: vec![".dogfood/**".to_owned()],
/// };
/// let merged = merge_document(json!({"vendors": {"other": {}}}), &entry)?;
/// assert_eq!(merged["vendors"]["git-dogfood"]["repo"], "o/gd");
/// assert!(merged["vendors"]["other"].is_object());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge_document(
    document: Value,
    entry: &VendorRegistryEntry,
) -> std::result::Result<Value, String> {
    let mut root = match document {
        Value::Object(root) => root,
        other => return Err(format!("top level must be an object, found {}", kind_of(&other))),
    };

    let value = serde_json::to_value(entry).map_err(|e| e.to_string())?;
    match root
        .entry(VENDORS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(vendors) => {
            vendors.insert(TOOL_NAME.to_owned(), value);
        }
        other => {
            return Err(format!(
                "\"{VENDORS_KEY}\" must be an object, found {}",
                kind_of(other)
            ));
        }
    }
    Ok(Value::Object(root))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
