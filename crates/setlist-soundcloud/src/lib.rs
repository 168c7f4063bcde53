//! SoundCloud metadata resolution
//!
//! Resolves public SoundCloud track and playlist URLs into flat metadata
//! records, searches tracks, and falls back to scraping the track page's
//! hydration data when the API is unavailable.

pub mod client;
pub mod error;
pub mod fields;
pub mod hydration;
pub mod models;
pub mod resolver;

pub use client::{HttpSoundCloudClient, SoundCloudApi, SoundCloudClientBuilder};
pub use error::{MetadataError, Result};
pub use hydration::{extract_track_from_html, HttpTrackScraper, TrackPageScraper};
pub use models::{
    MetadataRecord, PlaylistRecord, PlaylistTrack, ScrapedTrack, SearchTrack, SearchUser,
    UserRecord,
};
pub use resolver::{MetadataResolver, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, SOUNDCLOUD_URL_PREFIX};
