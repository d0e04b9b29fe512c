//! Validated `owner/name` repository identifiers.
//!
//! Both transports build URLs from the slug, so it is checked once at
//! configuration time rather than at every fetch.

use crate::error::{InstallerError, Result};
use serde::Serialize;
use std::fmt;

/// A repository identifier of the form `owner/name`.
///
/// # Examples
///
/// ```
/// use git_dogfood_installer::repo_slug::RepoSlug;
///
/// let slug = RepoSlug::try_from("mangimangi/git-dogfood").expect("valid slug");
/// assert_eq!(slug.owner(), "mangimangi");
/// assert_eq!(slug.name(), "git-dogfood");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoSlug(String);

impl RepoSlug {
    /// Return the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the owner half of the slug.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.0.split_once('/').map_or("", |(owner, _)| owner)
    }

    /// Return the repository-name half of the slug.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once('/').map_or("", |(_, name)| name)
    }
}

impl TryFrom<&str> for RepoSlug {
    type Error = InstallerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_repo_slug(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = InstallerError;

    fn try_from(value: String) -> Result<Self> {
        validate_repo_slug(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for RepoSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_repo_slug(value: &str) -> Result<()> {
    let reject = |reason| {
        Err(InstallerError::InvalidRepo {
            value: value.to_owned(),
            reason,
        })
    };

    if value.chars().any(char::is_whitespace) {
        return reject("repository must not contain whitespace");
    }
    let Some((owner, name)) = value.split_once('/') else {
        return reject("expected owner/name");
    };
    if owner.is_empty() || name.is_empty() {
        return reject("owner and name must both be non-empty");
    }
    if name.contains('/') {
        return reject("expected exactly one '/'");
    }
    Ok(())
}
