//! setlist-recognize - Build a setlist from a SoundCloud mix
//!
//! Usage: setlist-recognize <url> [--chunk-seconds 60] [--output setlist.json]

use anyhow::{Context, Result};
use clap::Parser;
use setlist_cli::output::print_report;
use setlist_core::{
    AuddRecognizer, Pipeline, PipelineOptions, SetlistConfig, WavSlicer, YtDlpDownloader,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "setlist-recognize")]
#[command(about = "Recognize the tracks of a mix and write the melted setlist", long_about = None)]
struct Args {
    /// Track URL to download
    url: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Segment length in seconds (overrides config)
    #[arg(long)]
    chunk_seconds: Option<u64>,

    /// Segments recognized in parallel (overrides config)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Melted setlist path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the raw per-segment track list here
    #[arg(long)]
    track_list: Option<PathBuf>,

    /// Work directory for the download and segments
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Keep the downloaded audio
    #[arg(long)]
    keep_download: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Default: no logs (clean JSON output for parsing)
    let level = if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut config = SetlistConfig::load_or_default(args.config.as_deref())?;
    if let Some(chunk_seconds) = args.chunk_seconds {
        config.recognition.chunk_seconds = chunk_seconds;
    }
    if let Some(concurrency) = args.concurrency {
        config.recognition.concurrency = concurrency;
    }
    if let Some(output) = args.output {
        config.output.setlist_path = output;
    }
    if args.track_list.is_some() {
        config.output.track_list_path = args.track_list;
    }
    if args.work_dir.is_some() {
        config.recognition.work_dir = args.work_dir;
    }
    config.recognition.keep_download |= args.keep_download;
    config.validate()?;

    if config.recognition.api_token.is_none() {
        log::warn!("No AUDD_API_TOKEN set, recognition requests may be rejected");
    }

    let recognition = &config.recognition;
    let recognizer = AuddRecognizer::new(
        recognition.endpoint.clone(),
        recognition.api_token.clone(),
        Duration::from_secs(recognition.timeout_secs),
    )
    .context("Failed to build recognizer")?;

    let pipeline = Pipeline::new(
        Box::new(YtDlpDownloader::new(recognition.download_format.clone())),
        Box::new(WavSlicer::new(recognition.sample_rate)),
        Box::new(recognizer),
        PipelineOptions::from_config(recognition, &config.output),
    );

    let report = pipeline
        .run(&args.url, &config.output.setlist_path)
        .await
        .with_context(|| format!("Recognition failed for {}", args.url))?;

    print_report(&report);

    Ok(())
}
