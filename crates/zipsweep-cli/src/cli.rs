//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "zipsweep")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub unpack: UnpackArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Root directory to search for archives (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite files that already exist in the extraction folder
    #[arg(long)]
    pub force: bool,

    /// Delete stale siblings and fully extracted archives
    #[arg(long)]
    pub cleanup: bool,

    /// Extension of the archives to unpack
    #[arg(long, value_name = "EXT", default_value = "zip", value_parser = parse_extension)]
    pub archive_ext: String,

    /// Extension of freshly extracted files that replace stale siblings
    #[arg(long, value_name = "EXT", default_value = "flac", value_parser = parse_extension)]
    pub primary_ext: String,

    /// Extension of stale siblings deleted during cleanup
    #[arg(long, value_name = "EXT", default_value = "mp3", value_parser = parse_extension)]
    pub stale_ext: String,

    /// Keep stale siblings even with --cleanup
    #[arg(long)]
    pub no_stale_cleanup: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse a file extension, with or without its leading dot
fn parse_extension(s: &str) -> Result<String, String> {
    let ext = s.trim().trim_start_matches('.');
    if ext.is_empty() {
        return Err("empty extension".to_string());
    }
    if ext.contains(['/', '\\']) {
        return Err(format!("invalid extension: {s}"));
    }
    Ok(ext.to_string())
}
