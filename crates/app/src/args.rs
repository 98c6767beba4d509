use std::path::PathBuf;

use clap::Parser;

use crate::Command;

/// Move files onto fixed-capacity archive media and keep them reachable
/// through symlinks at their original paths.
#[derive(Parser, Debug)]
#[command(name = "shelf", author, version, about, long_about = None)]
pub struct Args {
    /// Override the state directory (default: ~/.shelf)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}
