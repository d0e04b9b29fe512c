//! Output formatting for the installer CLI.
//!
//! Progress lines go to stdout so that consumers wrapping the installer can
//! capture them; errors are written to stderr by the binary.

use crate::artefact::Artefact;
use crate::config::InstallConfig;
use std::io::Write;

/// Write one line to `out`, ignoring write failures.
///
/// Progress output is best-effort: a closed pipe must not turn a successful
/// install into a failure.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Banner printed before anything is fetched.
#[must_use]
pub fn start_message(config: &InstallConfig) -> String {
    format!("Installing git-dogfood {} from {}", config.git_ref, config.repo)
}

/// Line printed for each file written.
#[must_use]
pub fn installed_message(relative_path: &str) -> String {
    format!("Installed {relative_path}")
}

/// Notice printed when an artefact is left untouched.
#[must_use]
pub fn skip_notice(relative_path: &str) -> String {
    format!("{relative_path} already exists, skipping")
}

/// Line printed after the manifest has been appended to.
#[must_use]
pub fn manifest_message(count: usize, manifest: &str) -> String {
    let plural = if count == 1 { "path" } else { "paths" };
    format!("Recorded {count} {plural} in {manifest}")
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(git_ref: &str, install_dir: &str) -> String {
    format!("git-dogfood {git_ref} installed to {install_dir}")
}

/// Configuration information for dry-run output.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use git_dogfood_installer::artefact::plan_artefacts;
/// use git_dogfood_installer::cli::Cli;
/// use git_dogfood_installer::config::InstallConfig;
/// use git_dogfood_installer::output::DryRunInfo;
///
/// let cli = Cli {
///     git_ref: Some("1.0.0".to_owned()),
///     repo: Some("o/gd".to_owned()),
///     ..Cli::default()
/// };
/// let config = InstallConfig::resolve(&cli, Utf8PathBuf::from("/repo"), &|_| None)?;
/// let artefacts = plan_artefacts(&config);
///
/// let output = DryRunInfo::new(&config, &artefacts).display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains(".dogfood/resolve"));
/// # Ok::<(), git_dogfood_installer::error::InstallerError>(())
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The resolved configuration.
    pub config: &'a InstallConfig,
    /// Artefacts that a real run would consider.
    pub artefacts: &'a [Artefact],
}

impl<'a> DryRunInfo<'a> {
    /// Create dry-run information for `config`.
    #[must_use]
    pub fn new(config: &'a InstallConfig, artefacts: &'a [Artefact]) -> Self {
        Self { config, artefacts }
    }

    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let config = self.config;
        let transport = if config.auth_token.is_some() {
            format!("authenticated API ({})", config.endpoints.api)
        } else {
            format!("anonymous download ({})", config.endpoints.raw)
        };
        let manifest = config
            .manifest_path
            .as_ref()
            .map_or_else(|| "disabled".to_owned(), ToString::to_string);

        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Protocol: {}", config.protocol),
            format!("Ref: {}", config.git_ref),
            format!("Repository: {}", config.repo),
            format!("Root: {}", config.root),
            format!("Install directory: {}", config.install_dir),
            format!("Manifest: {manifest}"),
            format!("Transport: {transport}"),
            String::new(),
            "Files:".to_owned(),
        ];

        for artefact in self.artefacts {
            lines.push(format!("  - {artefact} ({:?})", artefact.policy()));
        }

        lines.join("\n")
    }
}
