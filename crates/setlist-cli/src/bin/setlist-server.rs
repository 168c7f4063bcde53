//! setlist-server - SoundCloud metadata HTTP API
//!
//! Usage: setlist-server [--config setlist.toml] [--host 0.0.0.0] [--port 5000]

use anyhow::{Context, Result};
use clap::Parser;
use setlist_cli::{build_router, AppState, BuildInfo};
use setlist_core::SetlistConfig;
use setlist_soundcloud::{HttpSoundCloudClient, HttpTrackScraper, MetadataResolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "setlist-server")]
#[command(about = "Serve SoundCloud metadata over HTTP", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut config = SetlistConfig::load_or_default(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let client = HttpSoundCloudClient::builder()
        .api_base_url(&config.soundcloud.api_base_url)
        .web_base_url(&config.soundcloud.web_base_url)
        .maybe_client_id(config.soundcloud.client_id.clone())
        .timeout(Duration::from_secs(config.soundcloud.timeout_secs))
        .build()
        .context("Failed to build SoundCloud client")?;
    let scraper = HttpTrackScraper::new(client.http_client().clone());

    let mut resolver = MetadataResolver::new(Arc::new(client));
    if config.soundcloud.scrape_fallback {
        resolver = resolver.with_scraper(Arc::new(scraper));
    }

    let build = BuildInfo::from_env();
    log::info!("Build: job {} commit {}", build.job_id, build.commit_id);

    let app = build_router(
        AppState::new(resolver, build),
        &config.server.cors_allowed_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
