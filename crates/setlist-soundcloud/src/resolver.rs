//! Metadata resolution over the API client and the page scraper

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::client::SoundCloudApi;
use crate::error::{MetadataError, Result};
use crate::fields;
use crate::hydration::TrackPageScraper;
use crate::models::{MetadataRecord, PlaylistRecord, PlaylistTrack, SearchTrack};

/// Only canonical public URLs are accepted
pub const SOUNDCLOUD_URL_PREFIX: &str = "https://soundcloud.com/";

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 200;

/// Resolves SoundCloud URLs into normalized records
///
/// The API client is tried first. When it is unavailable, or returns a
/// track without a title, the track page is scraped instead if a scraper
/// is configured. Nothing is retried.
#[derive(Clone)]
pub struct MetadataResolver {
    api: Arc<dyn SoundCloudApi>,
    scraper: Option<Arc<dyn TrackPageScraper>>,
}

impl MetadataResolver {
    pub fn new(api: Arc<dyn SoundCloudApi>) -> Self {
        Self { api, scraper: None }
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn TrackPageScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// Reject anything but a non-empty canonical SoundCloud URL
    pub fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(MetadataError::invalid_input("Missing 'url' in request body"));
        }
        if !url.starts_with(SOUNDCLOUD_URL_PREFIX) {
            return Err(MetadataError::invalid_input("Invalid SoundCloud URL"));
        }
        Ok(())
    }

    /// Resolve a track URL
    pub async fn resolve_track(&self, url: &str) -> Result<MetadataRecord> {
        Self::validate_url(url)?;

        match self.api.resolve(url).await {
            Ok(Some(resource)) => {
                ensure_kind(&resource, &["track"])?;
                let record = MetadataRecord::from_value(&resource);
                if record.title.is_some() {
                    return Ok(record);
                }
                match &self.scraper {
                    Some(scraper) => {
                        log::info!("API record for {} has no title, scraping page", url);
                        let scraped = scraper.scrape(url).await?;
                        Ok(MetadataRecord::from_scraped(&scraped))
                    }
                    None => Ok(record),
                }
            }
            Ok(None) => Err(MetadataError::NotFound),
            Err(MetadataError::UpstreamUnavailable(reason)) => match &self.scraper {
                Some(scraper) => {
                    log::warn!("SoundCloud API unavailable ({}), scraping {}", reason, url);
                    let scraped = scraper.scrape(url).await?;
                    Ok(MetadataRecord::from_scraped(&scraped))
                }
                None => Err(MetadataError::UpstreamUnavailable(reason)),
            },
            Err(e) => Err(e),
        }
    }

    /// Resolve a playlist URL, optionally completing its track list
    pub async fn resolve_playlist(&self, url: &str, load_tracks: bool) -> Result<PlaylistRecord> {
        Self::validate_url(url)?;

        let resource = self.api.resolve(url).await?.ok_or(MetadataError::NotFound)?;
        ensure_kind(&resource, &["playlist", "system-playlist"])?;

        let mut playlist = PlaylistRecord::from_value(&resource);
        if !load_tracks {
            playlist.tracks.clear();
            return Ok(playlist);
        }

        self.complete_stub_tracks(&mut playlist.tracks).await;
        Ok(playlist)
    }

    /// Replace id-only entries with full tracks, keeping playlist order
    async fn complete_stub_tracks(&self, tracks: &mut [PlaylistTrack]) {
        let stub_ids: Vec<u64> = tracks
            .iter()
            .filter(|t| t.is_stub())
            .filter_map(|t| t.id)
            .collect();
        if stub_ids.is_empty() {
            return;
        }

        log::debug!("Loading {} stub playlist tracks", stub_ids.len());
        let found = match self.api.tracks_by_ids(&stub_ids).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Failed to load playlist tracks, keeping stubs: {}", e);
                return;
            }
        };

        let by_id: HashMap<u64, PlaylistTrack> = found
            .iter()
            .filter_map(|v| fields::u64(v, "id").map(|id| (id, PlaylistTrack::from_value(v))))
            .collect();

        for track in tracks.iter_mut().filter(|t| t.is_stub()) {
            if let Some(full) = track.id.and_then(|id| by_id.get(&id)) {
                *track = full.clone();
            }
        }
    }

    /// Search tracks; `limit` defaults to 20 and is clamped to 1..=200
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchTrack>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MetadataError::invalid_input("Missing 'query' in request body"));
        }
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);

        let tracks = self.api.search_tracks(query, limit).await?;
        Ok(tracks.iter().take(limit).map(SearchTrack::from_value).collect())
    }
}

/// A resource without `kind` is accepted
fn ensure_kind(resource: &Value, expected: &[&str]) -> Result<()> {
    match fields::string(resource, "kind") {
        Some(kind) if !expected.contains(&kind.as_str()) => {
            log::debug!("Resolved a {} where {:?} was expected", kind, expected);
            Err(MetadataError::NotFound)
        }
        _ => Ok(()),
    }
}
