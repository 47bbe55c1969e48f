//! Zipsweep CLI - unpacks every zip archive under a directory tree.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match &cli.command {
        Some(cli::Commands::Completion(args)) => {
            commands::completion::execute(args.shell);
            ExitCode::SUCCESS
        }
        None => {
            let mut formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
            let show_progress = progress::CliProgress::should_show(cli.json, cli.quiet);
            match commands::unpack::execute(
                &cli.unpack,
                cli.verbose,
                show_progress,
                &mut *formatter,
            ) {
                Ok(false) => ExitCode::SUCCESS,
                Ok(true) => ExitCode::FAILURE,
                Err(err) => {
                    formatter.format_error(&err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Installs the stderr diagnostics subscriber. `RUST_LOG` overrides the
/// level derived from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "warn,zipsweep_core=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
