use std::path::PathBuf;

use clap::Parser;
use codeask_common::TrackingPolicy;

/// codeask: ask questions about your code, with the files you pick as context.
///
/// Speaks JSON lines on stdin/stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "codeask", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `codeask=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Workspace root that file ids resolve against.
    #[arg(short = 'w', long)]
    pub workspace: Option<PathBuf>,

    /// Tracking policy override (manual, workspace).
    #[arg(long)]
    pub policy: Option<TrackingPolicy>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
