use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "submux")]
#[command(author, version, about = "Merge loose subtitle files into their videos with mkvmerge")]
pub struct Cli {
    /// Directories to scan for subtitle folders
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Build and print merge commands without executing or deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep original videos and subtitle directories after merging
    #[arg(long)]
    pub keep: bool,

    /// Increase log verbosity (-v debug, -vv trace plus mkvmerge output)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
