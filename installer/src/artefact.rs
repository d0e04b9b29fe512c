//! Artefact descriptors and per-artefact installation policy.
//!
//! Each file the installer may write is described by an [`Artefact`]: where
//! it lands relative to the consumer root, where its bytes come from, and
//! whether an existing file at the destination is replaced or left alone.

use crate::config::{InstallConfig, Protocol};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fmt;

/// File name of the resolver inside the install directory.
pub const RESOLVER_FILENAME: &str = "resolve";
/// Path of the resolver inside the source repository.
pub const RESOLVER_REMOTE_PATH: &str = "resolve";
/// Destination of the CI workflow, relative to the consumer root.
pub const WORKFLOW_PATH: &str = ".github/workflows/dogfood.yml";
/// Path of the CI workflow template inside the source repository.
pub const WORKFLOW_REMOTE_PATH: &str = "templates/github/workflows/dogfood.yml";
/// File name of the legacy version stamp inside the install directory.
pub const VERSION_FILENAME: &str = ".version";

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPolicy {
    /// Replace the existing file on every run.
    AlwaysOverwrite,
    /// Leave an existing file untouched and report it as skipped.
    SkipIfExists,
}

/// Where an artefact's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtefactSource {
    /// A file fetched from the source repository at the configured ref.
    Remote(&'static str),
    /// Content generated locally.
    Inline(Vec<u8>),
}

/// A file the installer may write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artefact {
    relative_path: String,
    source: ArtefactSource,
    policy: InstallPolicy,
    executable: bool,
}

impl Artefact {
    /// Create an artefact descriptor.
    #[must_use]
    pub fn new(
        relative_path: impl Into<String>,
        source: ArtefactSource,
        policy: InstallPolicy,
        executable: bool,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            source,
            policy,
            executable,
        }
    }

    /// Destination relative to the consumer root, with `/` separators.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Source of the artefact's bytes.
    #[must_use]
    pub fn source(&self) -> &ArtefactSource {
        &self.source
    }

    /// Overwrite policy.
    #[must_use]
    pub fn policy(&self) -> InstallPolicy {
        self.policy
    }

    /// Whether the written file is marked executable.
    #[must_use]
    pub fn executable(&self) -> bool {
        self.executable
    }

    /// Destination joined onto `root`.
    #[must_use]
    pub fn destination(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.relative_path)
    }
}

impl fmt::Display for Artefact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path)
    }
}

/// Plan the artefacts for a run, in installation order.
///
/// The resolver always comes first and the workflow second. Legacy runs
/// append the version stamp.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use git_dogfood_installer::artefact::plan_artefacts;
/// use git_dogfood_installer::cli::Cli;
/// use git_dogfood_installer::config::InstallConfig;
///
/// let cli = Cli {
///     git_ref: Some("1.0.0".to_owned()),
///     repo: Some("o/gd".to_owned()),
///     ..Cli::default()
/// };
/// let config = InstallConfig::resolve(&cli, Utf8PathBuf::from("/repo"), &|_| None)?;
/// let paths: Vec<_> = plan_artefacts(&config)
///     .iter()
///     .map(|artefact| artefact.relative_path().to_owned())
///     .collect();
/// assert_eq!(
///     paths,
///     [".dogfood/resolve", ".github/workflows/dogfood.yml", ".dogfood/.version"]
/// );
/// # Ok::<(), git_dogfood_installer::error::InstallerError>(())
/// ```
#[must_use]
pub fn plan_artefacts(config: &InstallConfig) -> Vec<Artefact> {
    let mut artefacts = vec![
        Artefact::new(
            install_dir_entry(&config.install_dir, RESOLVER_FILENAME),
            ArtefactSource::Remote(RESOLVER_REMOTE_PATH),
            InstallPolicy::AlwaysOverwrite,
            true,
        ),
        Artefact::new(
            WORKFLOW_PATH,
            ArtefactSource::Remote(WORKFLOW_REMOTE_PATH),
            InstallPolicy::SkipIfExists,
            false,
        ),
    ];

    if config.protocol == Protocol::Legacy {
        artefacts.push(Artefact::new(
            install_dir_entry(&config.install_dir, VERSION_FILENAME),
            ArtefactSource::Inline(format!("{}\n", config.git_ref).into_bytes()),
            InstallPolicy::AlwaysOverwrite,
            false,
        ));
    }

    artefacts
}

/// Render `<install_dir>/<file>` with `/` separators, dropping `.` segments.
///
/// `install_dir` is already relative to the consumer root.
pub(crate) fn install_dir_entry(install_dir: &Utf8Path, file: &str) -> String {
    install_dir
        .components()
        .filter(|component| !matches!(component, Utf8Component::CurDir))
        .map(|component| component.as_str())
        .chain([file])
        .collect::<Vec<_>>()
        .join("/")
}
