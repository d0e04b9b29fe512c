//! Run configuration and precedence rules.
//!
//! Configuration comes from two places: the legacy positional `<REF> <REPO>`
//! arguments and the `VENDOR_*` environment variables used by the newer
//! vendoring protocol. The ref/repository pair is taken atomically from one
//! source: both environment variables win over positional arguments, and a
//! half-set environment pair is rejected instead of being mixed with a
//! positional value.

use crate::cli::Cli;
use crate::error::{InstallerError, Result};
use crate::repo_slug::RepoSlug;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fmt;

/// Environment variable carrying the ref to install.
pub const ENV_REF: &str = "VENDOR_REF";
/// Environment variable carrying the source repository.
pub const ENV_REPO: &str = "VENDOR_REPO";
/// Environment variable overriding the install directory.
pub const ENV_INSTALL_DIR: &str = "VENDOR_INSTALL_DIR";
/// Environment variable enabling manifest recording.
pub const ENV_MANIFEST: &str = "VENDOR_MANIFEST";
/// Primary credential variable; selects the authenticated transport.
pub const ENV_TOKEN: &str = "GH_TOKEN";
/// Fallback credential variable, consulted when [`ENV_TOKEN`] is unset.
pub const ENV_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
/// Environment variable overriding the contents API base URL.
pub const ENV_API_URL: &str = "VENDOR_API_URL";
/// Environment variable overriding the raw-content base URL.
pub const ENV_RAW_URL: &str = "VENDOR_RAW_URL";

/// Install directory used when none is configured.
pub const DEFAULT_INSTALL_DIR: &str = ".dogfood";
/// Default contents API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default raw-content base URL.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Which invocation protocol supplied the ref and repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Positional `<REF> <REPO>` arguments. Writes the version stamp and
    /// registers in the shared vendor registry.
    Legacy,
    /// `VENDOR_REF`/`VENDOR_REPO` environment variables. Registration is
    /// owned by the calling vendoring tool.
    Environment,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy (positional arguments)"),
            Self::Environment => f.write_str("environment (VENDOR_REF/VENDOR_REPO)"),
        }
    }
}

/// Base URLs the transports fetch from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Contents API base URL, used by the authenticated transport.
    pub api: String,
    /// Raw-content base URL, used by the anonymous transport.
    pub raw: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_URL.to_owned(),
            raw: DEFAULT_RAW_URL.to_owned(),
        }
    }
}

/// Fully resolved configuration for one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Version tag, branch or commit to install.
    pub git_ref: String,
    /// Source repository.
    pub repo: RepoSlug,
    /// Install directory, relative to [`InstallConfig::root`].
    pub install_dir: Utf8PathBuf,
    /// Manifest file to append installed paths to, already resolved against
    /// the root. `None` disables recording.
    pub manifest_path: Option<Utf8PathBuf>,
    /// Credential for the authenticated transport.
    pub auth_token: Option<String>,
    /// Protocol that supplied the ref and repository.
    pub protocol: Protocol,
    /// Consumer repository root.
    pub root: Utf8PathBuf,
    /// Transport base URLs.
    pub endpoints: Endpoints,
}

impl InstallConfig {
    /// Resolve configuration from CLI arguments and an environment lookup.
    ///
    /// `env` returns the value of a variable, or `None` when unset. Empty
    /// values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::PartialEnvironment`] when only one of
    /// [`ENV_REF`]/[`ENV_REPO`] is set, [`InstallerError::MissingConfig`] when
    /// neither source supplies both values, and
    /// [`InstallerError::InvalidRepo`] for a malformed repository.
    /// [`InstallerError::InstallDirOutsideRoot`] is returned when the install
    /// directory does not lie inside `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use git_dogfood_installer::cli::Cli;
    /// use git_dogfood_installer::config::{InstallConfig, Protocol};
    ///
    /// let cli = Cli {
    ///     git_ref: Some("1.0.0".to_owned()),
    ///     repo: Some("old/repo".to_owned()),
    ///     ..Cli::default()
    /// };
    /// let env = |key: &str| match key {
    ///     "VENDOR_REF" => Some("5.0.0".to_owned()),
    ///     "VENDOR_REPO" => Some("new/repo".to_owned()),
    ///     _ => None,
    /// };
    ///
    /// let config = InstallConfig::resolve(&cli, Utf8PathBuf::from("/repo"), &env)?;
    /// assert_eq!(config.git_ref, "5.0.0");
    /// assert_eq!(config.repo.as_str(), "new/repo");
    /// assert_eq!(config.protocol, Protocol::Environment);
    /// # Ok::<(), git_dogfood_installer::error::InstallerError>(())
    /// ```
    pub fn resolve(
        cli: &Cli,
        root: Utf8PathBuf,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |key: &str| env(key).filter(|value| !value.is_empty());

        let (git_ref, repo, protocol) = resolve_ref_and_repo(cli, &lookup)?;
        let repo = RepoSlug::try_from(repo)?;

        let configured_dir = lookup(ENV_INSTALL_DIR)
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_INSTALL_DIR), Utf8PathBuf::from);
        let install_dir = relative_install_dir(&root, &configured_dir)?;
        let manifest_path = lookup(ENV_MANIFEST).map(|path| root.join(path));
        let auth_token = lookup(ENV_TOKEN).or_else(|| lookup(ENV_TOKEN_FALLBACK));
        let endpoints = Endpoints {
            api: lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            raw: lookup(ENV_RAW_URL).unwrap_or_else(|| DEFAULT_RAW_URL.to_owned()),
        };

        log::debug!("resolved {protocol} configuration for {repo}@{git_ref}");

        Ok(Self {
            git_ref,
            repo,
            install_dir,
            manifest_path,
            auth_token,
            protocol,
            root,
            endpoints,
        })
    }

    /// Resolve configuration from CLI arguments and the process environment.
    ///
    /// # Errors
    ///
    /// See [`InstallConfig::resolve`].
    pub fn from_process_env(cli: &Cli, root: Utf8PathBuf) -> Result<Self> {
        Self::resolve(cli, root, &|key| std::env::var(key).ok())
    }

    /// Absolute (root-joined) install directory.
    #[must_use]
    pub fn install_dir_path(&self) -> Utf8PathBuf {
        self.root.join(&self.install_dir)
    }
}

/// Pick the ref/repository pair from exactly one source.
fn resolve_ref_and_repo(
    cli: &Cli,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<(String, String, Protocol)> {
    match (lookup(ENV_REF), lookup(ENV_REPO)) {
        (Some(git_ref), Some(repo)) => return Ok((git_ref, repo, Protocol::Environment)),
        (Some(_), None) => {
            return Err(InstallerError::PartialEnvironment {
                present: ENV_REF,
                missing: ENV_REPO,
            });
        }
        (None, Some(_)) => {
            return Err(InstallerError::PartialEnvironment {
                present: ENV_REPO,
                missing: ENV_REF,
            });
        }
        (None, None) => {}
    }

    let positional = |value: Option<&String>| value.filter(|v| !v.is_empty()).cloned();
    match (positional(cli.git_ref.as_ref()), positional(cli.repo.as_ref())) {
        (Some(git_ref), Some(repo)) => Ok((git_ref, repo, Protocol::Legacy)),
        _ => Err(InstallerError::MissingConfig),
    }
}

/// Express `install_dir` relative to `root`.
///
/// Absolute directories under `root` lose the root prefix. Absolute
/// directories elsewhere and relative ones climbing out through `..` are
/// rejected, so every recorded path stays relative to the consumer root.
fn relative_install_dir(root: &Utf8Path, install_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let outside = || InstallerError::InstallDirOutsideRoot {
        install_dir: install_dir.to_owned(),
        root: root.to_owned(),
    };

    let relative = if install_dir.is_absolute() {
        install_dir.strip_prefix(root).map_err(|_| outside())?
    } else {
        install_dir
    };

    if relative
        .components()
        .any(|component| matches!(component, Utf8Component::ParentDir))
    {
        return Err(outside());
    }
    if relative.as_str().is_empty() {
        return Ok(Utf8PathBuf::from("."));
    }
    Ok(relative.to_owned())
}

/// Resolve the consumer repository root.
///
/// Uses `explicit` when given, otherwise the current working directory. A
/// relative `explicit` path is anchored at the current working directory.
///
/// # Errors
///
/// Returns [`InstallerError::RootNotFound`] when the current directory cannot
/// be read or is not valid UTF-8.
pub fn resolve_root(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    match explicit {
        Some(root) if root.is_absolute() => Ok(root.to_owned()),
        Some(root) => Ok(current_dir()?.join(root)),
        None => current_dir(),
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| InstallerError::RootNotFound {
        reason: format!("could not read current directory: {e}"),
    })?;
    Utf8PathBuf::try_from(cwd).map_err(|e| InstallerError::RootNotFound {
        reason: format!("current directory is not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
