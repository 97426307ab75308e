use std::path::PathBuf;

use clap::Parser;

/// oaik — chat with and generate images from OpenAI models, one line at a time.
#[derive(Parser, Debug)]
#[command(name = "oaik", version, about)]
pub struct Args {
    /// Run a single input (a cell or a %command) and exit.
    #[arg(short = 'e', long)]
    pub execute: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use the offline mock client instead of the OpenAI API.
    #[arg(long)]
    pub mock: bool,

    /// Directory generated images are written to.
    #[arg(long, default_value = ".")]
    pub image_dir: PathBuf,

    /// Skip the startup banner.
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
