//! Tests for installer CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["git-dogfood-install"]);
    assert!(cli.git_ref.is_none());
    assert!(cli.repo.is_none());
    assert!(cli.root.is_none());
    assert!(!cli.dry_run);
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn cli_parses_positional_ref_and_repo() {
    let cli = Cli::parse_from(["git-dogfood-install", "1.0.0", "o/gd"]);
    assert_eq!(cli.git_ref.as_deref(), Some("1.0.0"));
    assert_eq!(cli.repo.as_deref(), Some("o/gd"));
}

#[test]
fn cli_accepts_a_single_positional_argument() {
    // Completeness of the pair is checked during configuration resolution.
    let cli = Cli::parse_from(["git-dogfood-install", "1.0.0"]);
    assert_eq!(cli.git_ref.as_deref(), Some("1.0.0"));
    assert!(cli.repo.is_none());
}

#[test]
fn cli_parses_root() {
    let cli = Cli::parse_from(["git-dogfood-install", "--root", "/tmp/consumer"]);
    assert_eq!(cli.root, Some(Utf8PathBuf::from("/tmp/consumer")));
}

#[rstest]
#[case::dry_run(&["git-dogfood-install", "--dry-run"], |cli: &Cli| cli.dry_run)]
#[case::quiet_short(&["git-dogfood-install", "-q"], |cli: &Cli| cli.quiet)]
#[case::quiet_long(&["git-dogfood-install", "--quiet"], |cli: &Cli| cli.quiet)]
#[case::verbose(&["git-dogfood-install", "-v"], |cli: &Cli| cli.verbosity > 0)]
fn cli_parses_boolean_flags(#[case] args: &[&str], #[case] check: fn(&Cli) -> bool) {
    let cli = Cli::parse_from(args);
    assert!(check(&cli));
}

#[rstest]
#[case::double_short(&["git-dogfood-install", "-vv"], 2)]
#[case::double_long(&["git-dogfood-install", "--verbose", "--verbose"], 2)]
fn cli_parses_repeatable_verbosity(#[case] args: &[&str], #[case] expected: u8) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.verbosity, expected);
}

#[test]
fn cli_rejects_verbose_with_quiet() {
    Cli::try_parse_from(["git-dogfood-install", "--verbose", "--quiet"])
        .expect_err("expected clap to reject conflicting flags");
}

#[test]
fn cli_rejects_extra_positional_arguments() {
    Cli::try_parse_from(["git-dogfood-install", "1.0.0", "o/gd", "extra"])
        .expect_err("expected clap to reject a third positional argument");
}

#[test]
fn flags_may_follow_positional_arguments() {
    let cli = Cli::parse_from(["git-dogfood-install", "1.0.0", "o/gd", "--dry-run"]);
    assert!(cli.dry_run);
    assert_eq!(cli.repo.as_deref(), Some("o/gd"));
}
