//! Diagnostic logging setup for the installer binary.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter on stderr, which also captures `log`
//! records, so diagnostics never mix with the progress lines on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, e.g. `git_dogfood_installer=debug`.
pub const LOG_ENV: &str = "GIT_DOGFOOD_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";
const VERBOSE_DIRECTIVES: &str = "warn,git_dogfood_installer=debug";
const TRACE_DIRECTIVES: &str = "debug,git_dogfood_installer=trace";

/// Choose the filter directives for a run.
///
/// Any `-v` flag takes precedence over [`LOG_ENV`]; without one the
/// environment value is used when set and non-empty.
#[must_use]
pub fn filter_directives(verbosity: u8, env_value: Option<String>) -> String {
    match verbosity {
        0 => env_value
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_owned()),
        1 => VERBOSE_DIRECTIVES.to_owned(),
        _ => TRACE_DIRECTIVES.to_owned(),
    }
}

/// Install the stderr log subscriber.
///
/// Invalid directives fall back to the default filter. Initialisation is
/// best-effort: if a global subscriber is already set, the existing one is
/// kept.
pub fn init_logging(verbosity: u8) {
    let directives = filter_directives(verbosity, std::env::var(LOG_ENV).ok());
    let filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        // A subscriber is already installed; keep it.
    }
}
