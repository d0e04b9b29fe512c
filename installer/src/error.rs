//! Error types for the git-dogfood installer.
//!
//! This module defines semantic error variants that tell the user what went
//! wrong and, for configuration mistakes, how to supply the missing input.
//! Every variant is fatal: the binary prints it to stderr and exits non-zero.

use crate::transport::FetchError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during an installation run.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// Neither the positional arguments nor the environment supplied a ref
    /// and repository.
    #[error("missing ref and repository; pass <REF> <REPO> or set VENDOR_REF and VENDOR_REPO")]
    MissingConfig,

    /// Only one half of the environment ref/repository pair was set.
    #[error("{present} is set but {missing} is not; set both or neither")]
    PartialEnvironment {
        /// The variable that was set.
        present: &'static str,
        /// The variable that was missing or empty.
        missing: &'static str,
    },

    /// The repository identifier is not of the form `owner/name`.
    #[error("invalid repository \"{value}\": {reason}")]
    InvalidRepo {
        /// The rejected repository string.
        value: String,
        /// Description of the validation failure.
        reason: &'static str,
    },

    /// The install directory does not resolve to a location inside the
    /// consumer repository.
    #[error("install directory {install_dir} is outside the repository root {root}")]
    InstallDirOutsideRoot {
        /// The configured install directory.
        install_dir: Utf8PathBuf,
        /// The consumer repository root.
        root: Utf8PathBuf,
    },

    /// The consumer repository root could not be determined.
    #[error("repository root not found: {reason}")]
    RootNotFound {
        /// Description of why the root could not be resolved.
        reason: String,
    },

    /// A remote file could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A directory or installed file could not be written.
    #[error("failed to write {path}: {source}")]
    Filesystem {
        /// The path that could not be created or written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The install manifest could not be appended to.
    #[error("failed to append to manifest {path}: {source}")]
    Manifest {
        /// Path of the manifest file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The shared vendor registry exists but is not a usable JSON document.
    #[error("invalid vendor registry {path}: {reason}")]
    RegistryParse {
        /// Path of the registry file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The merged vendor registry could not be written back.
    #[error("failed to update vendor registry {path}: {source}")]
    RegistryWrite {
        /// Path of the registry file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
