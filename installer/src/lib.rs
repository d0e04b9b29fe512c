//! git-dogfood installer library.
//!
//! This crate vendors the git-dogfood `resolve` script and its CI workflow
//! into a consumer repository. It is used by the `git-dogfood-install` CLI
//! binary and can be driven programmatically for testing or from other
//! vendoring tools.
//!
//! # Modules
//!
//! - [`artefact`] - Artefact descriptors and overwrite policies
//! - [`atomic_write`] - Whole-file replacement through a temporary file
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Configuration resolution from arguments and environment
//! - [`error`] - Semantic error types
//! - [`install`] - Two-phase artefact installation
//! - [`logging`] - Diagnostic log subscriber setup
//! - [`manifest`] - Shared manifest recording
//! - [`output`] - Progress and dry-run formatting
//! - [`pipeline`] - Run orchestration
//! - [`registry`] - Shared vendor registry merging
//! - [`repo_slug`] - Validated `owner/name` repository identifiers
//! - [`transport`] - Authenticated and anonymous remote file fetching

pub mod artefact;
pub mod atomic_write;
pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod repo_slug;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
