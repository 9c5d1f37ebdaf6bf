use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build and inspect hero banner rotations from pre-fetched CMS feeds
#[derive(Parser)]
#[command(name = "hero-rotation")]
#[command(about = "Aggregate CMS feeds into a hero banner rotation", long_about = None)]
pub struct Cli {
    /// Rotation configuration (TOML); defaults to `HERO_ROTATION_CONFIG`, then the platform config dir
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the configuration and print resolved display parameters
    Check,
    /// List content sources in execution order
    Sources,
    /// Build the rotation from feed files and print it as JSON
    Build {
        /// Feed file for a source, as `<source-id>=<path.json>`
        #[arg(short, long = "feed", value_name = "SOURCE=PATH")]
        feeds: Vec<String>,
        /// Evaluate pin ages against this instant instead of the clock (RFC 3339)
        #[arg(long)]
        now: Option<String>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}
