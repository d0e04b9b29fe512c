//! git-dogfood installer CLI entrypoint.
//!
//! This binary fetches the git-dogfood resolver and CI workflow from the
//! source repository and installs them into the consumer repository. Progress
//! is printed to stdout; errors go to stderr with a non-zero exit status.

use clap::Parser;
use git_dogfood_installer::artefact::plan_artefacts;
use git_dogfood_installer::cli::Cli;
use git_dogfood_installer::config::{InstallConfig, resolve_root};
use git_dogfood_installer::error::Result;
use git_dogfood_installer::logging::init_logging;
use git_dogfood_installer::output::{DryRunInfo, write_line};
use git_dogfood_installer::pipeline;
use git_dogfood_installer::transport::select_transport;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let root = resolve_root(cli.root.as_deref())?;
    let config = InstallConfig::from_process_env(cli, root)?;

    // Dry-run mode: show what would be done without side effects
    if cli.dry_run {
        print_dry_run_info(&config, stdout);
        return Ok(());
    }

    let transport = select_transport(&config);
    if cli.quiet {
        pipeline::run(&config, transport.as_ref(), &mut std::io::sink())?;
    } else {
        pipeline::run(&config, transport.as_ref(), stdout)?;
    }
    Ok(())
}

/// Prints dry run configuration information.
fn print_dry_run_info(config: &InstallConfig, stdout: &mut dyn Write) {
    let artefacts = plan_artefacts(config);
    write_line(stdout, DryRunInfo::new(config, &artefacts).display_text());
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
