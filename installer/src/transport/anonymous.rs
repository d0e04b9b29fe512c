//! Anonymous raw-content downloads.

use super::http::{http_agent, read_body, segment_url};
use super::{FetchError, FetchResult, Transport, TransportKind};
use crate::repo_slug::RepoSlug;

/// Downloads files from the raw-content host without credentials.
#[derive(Debug, Clone)]
pub struct AnonymousFetch {
    base_url: String,
}

impl AnonymousFetch {
    /// Create a fetcher rooted at `base_url` (for example
    /// `https://raw.githubusercontent.com`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
        }
    }

    /// Construct the raw-content URL for a file.
    ///
    /// Each `/`-separated segment of the ref and path is percent-encoded, so
    /// refs containing `#` or `%` address the same file the contents API
    /// would return.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the base URL is unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_dogfood_installer::repo_slug::RepoSlug;
    /// use git_dogfood_installer::transport::AnonymousFetch;
    ///
    /// let fetch = AnonymousFetch::new("https://raw.githubusercontent.com");
    /// let repo = RepoSlug::try_from("o/gd").expect("valid slug");
    /// assert_eq!(
    ///     fetch.content_url(&repo, "1.0.0", "resolve")?,
    ///     "https://raw.githubusercontent.com/o/gd/1.0.0/resolve"
    /// );
    /// # Ok::<(), git_dogfood_installer::transport::FetchError>(())
    /// ```
    pub fn content_url(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        remote_path: &str,
    ) -> Result<String, FetchError> {
        let segments = [repo.owner(), repo.name()]
            .into_iter()
            .chain(git_ref.split('/'))
            .chain(remote_path.split('/'));
        segment_url(&self.base_url, segments)
    }
}

impl Transport for AnonymousFetch {
    fn fetch(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        remote_path: &str,
    ) -> Result<FetchResult, FetchError> {
        let url = self.content_url(repo, git_ref, remote_path)?;
        let bytes = read_body(&url, http_agent().get(&url))?;
        Ok(FetchResult::new(remote_path, bytes))
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Anonymous
    }
}
