//! Shared test utilities for the installer crate.

use crate::repo_slug::RepoSlug;
use crate::transport::{FetchError, FetchResult, Transport, TransportKind};
use std::cell::RefCell;
use std::collections::HashMap;

/// One recorded call to [`StubTransport::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    /// Repository requested.
    pub repo: String,
    /// Ref requested.
    pub git_ref: String,
    /// Remote path requested.
    pub remote_path: String,
}

/// A stub implementation of [`Transport`] for testing.
///
/// Serves canned file contents keyed by remote path and records every
/// request, allowing tests to verify what was fetched without network
/// access. Unknown paths fail with [`FetchError::NotFound`].
#[derive(Debug)]
pub struct StubTransport {
    kind: TransportKind,
    files: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<RecordedFetch>>,
}

impl StubTransport {
    /// Creates an empty stub reporting itself as `kind`.
    #[must_use]
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            files: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Adds a file served at `remote_path`.
    #[must_use]
    pub fn with_file(mut self, remote_path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(remote_path.to_owned(), contents.into());
        self
    }

    /// Returns every request made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedFetch> {
        self.calls.borrow().clone()
    }

    /// Returns the remote paths requested so far, in order.
    #[must_use]
    pub fn requested_paths(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.remote_path.clone())
            .collect()
    }
}

impl Transport for StubTransport {
    fn fetch(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        remote_path: &str,
    ) -> Result<FetchResult, FetchError> {
        self.calls.borrow_mut().push(RecordedFetch {
            repo: repo.as_str().to_owned(),
            git_ref: git_ref.to_owned(),
            remote_path: remote_path.to_owned(),
        });

        self.files
            .get(remote_path)
            .map(|bytes| FetchResult::new(remote_path, bytes.clone()))
            .ok_or_else(|| FetchError::NotFound {
                url: format!("stub://{repo}/{git_ref}/{remote_path}"),
            })
    }

    fn kind(&self) -> TransportKind {
        self.kind
    }
}
