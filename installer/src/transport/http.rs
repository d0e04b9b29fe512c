//! Shared HTTP plumbing for both transports.

use super::FetchError;
use std::sync::OnceLock;
use std::time::Duration;
use ureq::RequestBuilder;
use ureq::typestate::WithoutBody;
use url::Url;

/// Network timeout for a single file request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every request; the contents API rejects requests
/// without one.
pub(super) const USER_AGENT: &str = concat!("git-dogfood-installer/", env!("CARGO_PKG_VERSION"));

/// Shared `ureq` agent with request timeout configuration.
pub(super) fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Send `request` and return the full response body.
pub(super) fn read_body(
    url: &str,
    request: RequestBuilder<WithoutBody>,
) -> Result<Vec<u8>, FetchError> {
    log::trace!("GET {url}");
    let response = request
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_vec()
        .map_err(|e| FetchError::Http {
            url: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Map a ureq error to a [`FetchError`].
pub(super) fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Append `segments` to the path of `base`, percent-encoding each one.
///
/// `#`, `?`, `%` and `/` inside a segment are encoded, so a ref such as
/// `fix#12` stays one path segment instead of starting a fragment. Empty
/// segments are dropped.
pub(super) fn segment_url<'a>(
    base: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<String, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: base.to_owned(),
        reason,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("base URL cannot carry a path".to_owned()))?
        .pop_if_empty()
        .extend(segments.into_iter().filter(|segment| !segment.is_empty()));
    Ok(url.into())
}
