//! setlist-melt - Melt a raw per-segment track list into a setlist
//!
//! Usage: setlist-melt <track_list.json> <output.json>

use anyhow::{Context, Result};
use clap::Parser;
use setlist_cli::output::print_runs;
use setlist_core::melt_track_list_file;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setlist-melt")]
#[command(about = "Merge consecutive identical recognitions into setlist entries", long_about = None)]
struct Args {
    /// Raw track list JSON
    track_list: PathBuf,

    /// Melted setlist JSON to write
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if !args.track_list.exists() {
        anyhow::bail!("Track list not found: {}", args.track_list.display());
    }

    let runs = melt_track_list_file(&args.track_list, &args.output)
        .with_context(|| format!("Failed to melt {}", args.track_list.display()))?;
    log::info!("Wrote {} setlist entries to {}", runs.len(), args.output.display());

    print_runs(&runs);

    Ok(())
}
