//! CLI argument definitions for the git-dogfood installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration. Environment configuration is read separately by
//! [`crate::config`] because environment values take precedence over the
//! positional arguments defined here.

use camino::Utf8PathBuf;
use clap::Parser;

/// Install the git-dogfood resolver and CI workflow into a repository.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "git-dogfood-install")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the git-dogfood resolver and CI workflow into a repository.\n\n",
    "The resolver script is written to <install-dir>/resolve and marked ",
    "executable, replacing any previous version. The CI workflow is written to ",
    ".github/workflows/dogfood.yml only when that file does not already exist.\n\n",
    "The ref and repository come either from the positional arguments (legacy ",
    "protocol) or from VENDOR_REF and VENDOR_REPO. When both environment ",
    "variables are set they take precedence over the positional arguments.",
))]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  VENDOR_REF, VENDOR_REPO   Ref and owner/name repository (override arguments)\n",
    "  VENDOR_INSTALL_DIR        Install directory [default: .dogfood]\n",
    "  VENDOR_MANIFEST           Append installed paths to this file\n",
    "  GH_TOKEN, GITHUB_TOKEN    Fetch through the authenticated contents API\n",
    "  VENDOR_API_URL            Contents API base URL [default: https://api.github.com]\n",
    "  VENDOR_RAW_URL            Raw content base URL [default: https://raw.githubusercontent.com]\n",
    "  GIT_DOGFOOD_LOG           Diagnostic log filter (for example: debug)\n\n",
    "EXAMPLES:\n",
    "  Install a tagged release:\n",
    "    $ git-dogfood-install v1.2.0 mangimangi/git-dogfood\n\n",
    "  Install through the vendoring protocol:\n",
    "    $ VENDOR_REF=v1.2.0 VENDOR_REPO=mangimangi/git-dogfood git-dogfood-install\n\n",
    "  Preview without touching the network or filesystem:\n",
    "    $ git-dogfood-install --dry-run v1.2.0 mangimangi/git-dogfood",
))]
pub struct Cli {
    /// Version tag, branch or commit to install.
    #[arg(value_name = "REF")]
    pub git_ref: Option<String>,

    /// Source repository as owner/name.
    #[arg(value_name = "REPO")]
    pub repo: Option<String>,

    /// Consumer repository root [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,

    /// Show the resolved configuration and exit without installing.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase diagnostic log output (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
