//! Token-authenticated downloads through the repository contents API.
//!
//! The contents endpoint wraps the file in a JSON document whose `content`
//! field carries the bytes as line-wrapped base64. Decoding happens here so
//! callers receive exactly the bytes the anonymous transport would return.

use super::http::{http_agent, read_body, segment_url};
use super::{FetchError, FetchResult, Transport, TransportKind};
use crate::repo_slug::RepoSlug;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use std::fmt;

/// Media type requesting the JSON contents representation.
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// The only payload encoding the installer understands.
const BASE64_ENCODING: &str = "base64";

/// Fetches files through the authenticated contents API.
#[derive(Clone)]
pub struct AuthenticatedFetch {
    api_url: String,
    token: String,
}

/// Subset of the contents API response used by the installer.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    encoding: Option<String>,
}

impl AuthenticatedFetch {
    /// Create a fetcher for the API at `api_url` using `token`.
    #[must_use]
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            api_url: api_url.to_owned(),
            token: token.to_owned(),
        }
    }

    /// Construct the contents API URL for a file, without the ref query.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the API base URL is unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_dogfood_installer::repo_slug::RepoSlug;
    /// use git_dogfood_installer::transport::AuthenticatedFetch;
    ///
    /// let fetch = AuthenticatedFetch::new("https://api.github.com", "token");
    /// let repo = RepoSlug::try_from("o/gd").expect("valid slug");
    /// assert_eq!(
    ///     fetch.contents_url(&repo, "resolve")?,
    ///     "https://api.github.com/repos/o/gd/contents/resolve"
    /// );
    /// # Ok::<(), git_dogfood_installer::transport::FetchError>(())
    /// ```
    pub fn contents_url(&self, repo: &RepoSlug, remote_path: &str) -> Result<String, FetchError> {
        let segments = ["repos", repo.owner(), repo.name(), "contents"]
            .into_iter()
            .chain(remote_path.split('/'));
        segment_url(&self.api_url, segments)
    }
}

// The token never appears in debug output.
impl fmt::Debug for AuthenticatedFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedFetch")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Transport for AuthenticatedFetch {
    fn fetch(
        &self,
        repo: &RepoSlug,
        git_ref: &str,
        remote_path: &str,
    ) -> Result<FetchResult, FetchError> {
        let url = self.contents_url(repo, remote_path)?;
        let request = http_agent()
            .get(&url)
            .query("ref", git_ref)
            .header("Accept", ACCEPT_JSON)
            .header("Authorization", format!("Bearer {}", self.token));
        let body = read_body(&url, request)?;
        let bytes = decode_contents(&url, &body)?;
        Ok(FetchResult::new(remote_path, bytes))
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Authenticated
    }
}

/// Extract and decode the base64 `content` field of a contents response.
fn decode_contents(url: &str, body: &[u8]) -> Result<Vec<u8>, FetchError> {
    let malformed = |reason: String| FetchError::Malformed {
        url: url.to_owned(),
        reason,
    };

    let response: ContentsResponse =
        serde_json::from_slice(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    if let Some(encoding) = response.encoding.as_deref() {
        if encoding != BASE64_ENCODING {
            return Err(malformed(format!("unsupported encoding \"{encoding}\"")));
        }
    }

    let content = response
        .content
        .ok_or_else(|| malformed("missing \"content\" field".to_owned()))?;
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    BASE64
        .decode(compact)
        .map_err(|e| malformed(format!("invalid base64 content: {e}")))
}
