//! Remote file retrieval for vendored artefacts.
//!
//! Provides a trait-based abstraction over the two ways a file can be pulled
//! from the source repository: the authenticated contents API and the
//! anonymous raw-content host. The strategy is picked once per run by
//! [`select_transport`] and every artefact goes through the same instance.

pub mod anonymous;
pub mod authenticated;
mod http;

pub use anonymous::AnonymousFetch;
pub use authenticated::AuthenticatedFetch;

use crate::config::InstallConfig;
use crate::repo_slug::RepoSlug;
use std::fmt;

/// Bytes of one remote file together with the path they were fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    remote_path: String,
    bytes: Vec<u8>,
}

impl FetchResult {
    /// Create a fetch result for `remote_path`.
    #[must_use]
    pub fn new(remote_path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            remote_path: remote_path.into(),
            bytes,
        }
    }

    /// The path of the file inside the source repository.
    #[must_use]
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// The raw file content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the result and return the raw file content.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Which fetch strategy a [`Transport`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Token-authenticated contents API returning base64 payloads.
    Authenticated,
    /// Anonymous raw-content download.
    Anonymous,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated => f.write_str("authenticated API"),
            Self::Anonymous => f.write_str("anonymous download"),
        }
    }
}

/// Errors arising from fetching a remote file.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested file was not found (HTTP 404).
    #[error("file not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The response arrived but its payload could not be decoded.
    #[error("malformed response from {url}: {reason}")]
    Malformed {
        /// The URL that returned the malformed payload.
        url: String,
        /// Description of what was wrong with the payload.
        reason: String,
    },

    /// A request URL could not be built from the configured base URL.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The base URL that was rejected.
        url: String,
        /// Why the URL could not be used.
        reason: String,
    },

    /// Reading the response body failed.
    #[error("I/O error reading response: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for fetching files from the source repository.
///
/// Abstractions allow tests to replace HTTP behaviour without network
/// access.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Fetch `remote_path` from `repo` at `git_ref`.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success response or undecodable payload.
    fn fetch(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        remote_path: &str,
    ) -> Result<FetchResult, FetchError>;

    /// The strategy this transport implements.
    fn kind(&self) -> TransportKind;
}

/// Choose the transport for a run.
///
/// A configured credential selects [`AuthenticatedFetch`]; otherwise
/// [`AnonymousFetch`] is used.
#[must_use]
pub fn select_transport(config: &InstallConfig) -> Box<dyn Transport> {
    let transport: Box<dyn Transport> = match config.auth_token.as_deref() {
        Some(token) => Box::new(AuthenticatedFetch::new(&config.endpoints.api, token)),
        None => Box::new(AnonymousFetch::new(&config.endpoints.raw)),
    };
    log::debug!("selected {} transport", transport.kind());
    transport
}
