//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Split videos into equal parts and batch-rename files.
#[derive(Parser, Debug, Clone)]
#[command(name = "media-tools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./media-tools.toml when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split a video into N parts with ffmpeg stream copy.
    ///
    /// Prompts for anything not given on the command line and keeps asking
    /// for further videos until end of input.
    Split(SplitArgs),

    /// Renumber the files of a directory as <prefix><number><ext>.
    Rename(RenameArgs),

    /// Write a default configuration file.
    InitConfig {
        /// Where to write it.
        #[arg(default_value = "media-tools.toml")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Video file to split.
    pub input: Option<PathBuf>,

    /// Number of parts.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub parts: Option<i64>,

    /// Output directory (defaults to the video's directory).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing parts without asking.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the final report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Directory holding the files.
    pub dir: Option<PathBuf>,

    /// New name prefix, e.g. "btn_menu_".
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// First sequence number.
    #[arg(short, long)]
    pub start: Option<u64>,

    /// Only rename files with this extension.
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}
