//! Normalized SoundCloud records
//!
//! Built from the raw API JSON through the accessors in [`crate::fields`],
//! so a missing or malformed upstream field degrades to null or zero instead
//! of failing the whole record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields;

/// Track owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub permalink_url: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserRecord {
    pub fn from_value(user: &Value) -> Self {
        Self {
            id: fields::u64(user, "id"),
            username: fields::string(user, "username"),
            full_name: fields::string(user, "full_name"),
            permalink_url: fields::string(user, "permalink_url"),
            avatar_url: fields::string(user, "avatar_url"),
        }
    }
}

/// Flat track metadata returned by the metadata endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: Option<u64>,
    pub title: Option<String>,
    /// Owner username
    pub artist: Option<String>,
    /// Owner display name
    pub artist_name: Option<String>,
    /// Milliseconds
    pub duration: u64,
    pub duration_seconds: f64,
    pub genre: Option<String>,
    pub likes_count: u64,
    pub playback_count: u64,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub release_date: Option<String>,
    pub downloadable: bool,
    pub streamable: bool,
    pub user: Option<UserRecord>,
    /// Only known when scraped from the track page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Only known when scraped from the track page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

impl MetadataRecord {
    pub fn from_value(track: &Value) -> Self {
        let user = fields::object(track, "user").map(UserRecord::from_value);
        let duration = track_duration_ms(track);

        Self {
            id: fields::u64(track, "id"),
            title: fields::string(track, "title"),
            artist: user.as_ref().and_then(|u| u.username.clone()),
            artist_name: user.as_ref().and_then(|u| u.full_name.clone()),
            duration,
            duration_seconds: duration as f64 / 1000.0,
            genre: fields::string(track, "genre"),
            likes_count: fields::u64(track, "likes_count").unwrap_or(0),
            playback_count: fields::u64(track, "playback_count").unwrap_or(0),
            permalink_url: fields::string(track, "permalink_url"),
            artwork_url: fields::string(track, "artwork_url"),
            description: fields::string(track, "description"),
            created_at: fields::datetime(track, "created_at"),
            release_date: fields::datetime(track, "release_date"),
            downloadable: fields::bool(track, "downloadable").unwrap_or(false),
            streamable: fields::bool(track, "streamable").unwrap_or(false),
            user,
            album: None,
            publish_date: None,
        }
    }

    pub fn from_scraped(scraped: &ScrapedTrack) -> Self {
        Self {
            album: scraped.album(),
            publish_date: scraped
                .publish_date
                .as_deref()
                .and_then(fields::normalize_datetime)
                .or_else(|| scraped.publish_date.clone()),
            ..Self::from_value(&scraped.sound)
        }
    }
}

/// `duration` in milliseconds, else `full_duration`, else 0
fn track_duration_ms(track: &Value) -> u64 {
    fields::u64(track, "duration")
        .or_else(|| fields::u64(track, "full_duration"))
        .unwrap_or(0)
}

/// Track entry inside a playlist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub duration: u64,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
}

impl PlaylistTrack {
    pub fn from_value(track: &Value) -> Self {
        Self {
            id: fields::u64(track, "id"),
            title: fields::string(track, "title"),
            duration: track_duration_ms(track),
            permalink_url: fields::string(track, "permalink_url"),
            artwork_url: fields::string(track, "artwork_url"),
        }
    }

    /// Playlists only inline the first few tracks; the rest carry just an id
    pub fn is_stub(&self) -> bool {
        self.title.is_none()
    }
}

/// Playlist metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: u64,
    pub track_count: u64,
    pub artwork_url: Option<String>,
    pub permalink_url: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<UserRecord>,
    pub tracks: Vec<PlaylistTrack>,
}

impl PlaylistRecord {
    pub fn from_value(playlist: &Value) -> Self {
        let tracks: Vec<PlaylistTrack> = fields::array(playlist, "tracks")
            .map(|tracks| tracks.iter().map(PlaylistTrack::from_value).collect())
            .unwrap_or_default();

        Self {
            id: fields::u64(playlist, "id"),
            title: fields::string(playlist, "title"),
            description: fields::string(playlist, "description"),
            duration: fields::u64(playlist, "duration").unwrap_or(0),
            track_count: fields::u64(playlist, "track_count").unwrap_or(tracks.len() as u64),
            artwork_url: fields::string(playlist, "artwork_url"),
            permalink_url: fields::string(playlist, "permalink_url"),
            created_at: fields::datetime(playlist, "created_at"),
            user: fields::object(playlist, "user").map(UserRecord::from_value),
            tracks,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchUser {
    pub username: Option<String>,
    pub full_name: Option<String>,
}

/// Abbreviated track returned by search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTrack {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub duration: u64,
    pub genre: Option<String>,
    pub likes_count: u64,
    pub playback_count: u64,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub user: Option<SearchUser>,
}

impl SearchTrack {
    pub fn from_value(track: &Value) -> Self {
        Self {
            id: fields::u64(track, "id"),
            title: fields::string(track, "title"),
            duration: track_duration_ms(track),
            genre: fields::string(track, "genre"),
            likes_count: fields::u64(track, "likes_count").unwrap_or(0),
            playback_count: fields::u64(track, "playback_count").unwrap_or(0),
            permalink_url: fields::string(track, "permalink_url"),
            artwork_url: fields::string(track, "artwork_url"),
            user: fields::object(track, "user").map(|user| SearchUser {
                username: fields::string(user, "username"),
                full_name: fields::string(user, "full_name"),
            }),
        }
    }
}

/// Track data lifted from a track page
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedTrack {
    /// `data` of the `sound` hydration entry
    pub sound: Value,
    /// Text of the page's `time[pubdate]` element
    pub publish_date: Option<String>,
}

impl ScrapedTrack {
    pub fn album(&self) -> Option<String> {
        fields::object(&self.sound, "publisher_metadata")
            .and_then(|meta| fields::string(meta, "album_title"))
    }
}
