//! Unpack command implementation.

use crate::cli::UnpackArgs;
use crate::error::add_root_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::path::PathBuf;
use zipsweep_core::StaleSiblingRule;
use zipsweep_core::UnpackConfig;
use zipsweep_core::unpack_tree_with_progress;

/// Runs one unpack pass and returns whether any archive had failures.
pub fn execute(
    args: &UnpackArgs,
    verbose: bool,
    show_progress: bool,
    formatter: &mut dyn OutputFormatter,
) -> Result<bool> {
    let root = resolve_root(args)?;
    let config = build_config(args, verbose);
    tracing::debug!(root = %root.display(), ?config, "starting run");

    let report = if show_progress {
        let mut progress = CliProgress::new(&mut *formatter);
        let report = add_root_context(
            unpack_tree_with_progress(&root, &config, &mut progress),
            &root,
        )?;
        drop(progress);
        report
    } else {
        add_root_context(unpack_tree_with_progress(&root, &config, &mut *formatter), &root)?
    };

    formatter.format_batch_result(&root, &report)?;

    Ok(report.has_failures())
}

fn resolve_root(args: &UnpackArgs) -> Result<PathBuf> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    Ok(match &args.path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

fn build_config(args: &UnpackArgs, verbose: bool) -> UnpackConfig {
    let stale_sibling = if args.no_stale_cleanup {
        None
    } else {
        Some(StaleSiblingRule::new(&args.primary_ext, &args.stale_ext))
    };

    UnpackConfig::default()
        .with_force(args.force)
        .with_cleanup(args.cleanup)
        .with_verbose(verbose)
        .with_archive_extension(&args.archive_ext)
        .with_stale_sibling(stale_sibling)
}
