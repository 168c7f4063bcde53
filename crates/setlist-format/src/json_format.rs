//! JSON format for setlist files
//!
//! Times are stored as string-encoded integer seconds (`"start": "120"`).
//! Existing consumers of the setlist files read them that way, so both the
//! raw track list and the melted setlist keep the encoding.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while reading or writing setlist files
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid time value {value:?} in field `{field}`")]
    InvalidTime { field: &'static str, value: String },
}

/// One melted setlist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetlistEntry {
    pub track_title: String,
    pub artist: String,
    pub start: String,
    pub end: String,
}

impl SetlistEntry {
    pub fn new(track_title: impl Into<String>, artist: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            track_title: track_title.into(),
            artist: artist.into(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn start_seconds(&self) -> Result<u64, FormatError> {
        parse_seconds("start", &self.start)
    }

    pub fn end_seconds(&self) -> Result<u64, FormatError> {
        parse_seconds("end", &self.end)
    }
}

/// One raw, per-segment recognition as written before melting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackListEntry {
    #[serde(default)]
    pub path: String,
    pub track_title: String,
    pub artist: String,
    pub start: String,
    pub end: String,
}

impl TrackListEntry {
    pub fn new(
        path: impl Into<String>,
        track_title: impl Into<String>,
        artist: impl Into<String>,
        start: u64,
        end: u64,
    ) -> Self {
        Self {
            path: path.into(),
            track_title: track_title.into(),
            artist: artist.into(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn start_seconds(&self) -> Result<u64, FormatError> {
        parse_seconds("start", &self.start)
    }

    pub fn end_seconds(&self) -> Result<u64, FormatError> {
        parse_seconds("end", &self.end)
    }
}

fn parse_seconds(field: &'static str, value: &str) -> Result<u64, FormatError> {
    value.trim().parse::<u64>().map_err(|_| FormatError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Save a melted setlist as pretty-printed JSON
pub fn save_setlist(path: &Path, entries: &[SetlistEntry]) -> Result<(), FormatError> {
    write_json(path, entries)
}

/// Load a melted setlist
pub fn load_setlist(path: &Path) -> Result<Vec<SetlistEntry>, FormatError> {
    read_json(path)
}

/// Save a raw track list as pretty-printed JSON
pub fn save_track_list(path: &Path, entries: &[TrackListEntry]) -> Result<(), FormatError> {
    write_json(path, entries)
}

/// Load a raw track list
pub fn load_track_list(path: &Path) -> Result<Vec<TrackListEntry>, FormatError> {
    read_json(path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), FormatError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| FormatError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let json_str = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json_str).map_err(|source| FormatError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, FormatError> {
    let json_str = std::fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&json_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setlist_times_are_strings() {
        let entry = SetlistEntry::new("Track", "Artist", 0, 120);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["start"], serde_json::json!("0"));
        assert_eq!(json["end"], serde_json::json!("120"));
        assert_eq!(json["track_title"], "Track");
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("setlist.json");
        let entries = vec![
            SetlistEntry::new("A", "X", 0, 120),
            SetlistEntry::new("Unknown", "Unknown", 120, 180),
        ];

        save_setlist(&path, &entries).unwrap();
        let loaded = load_setlist(&path).unwrap();

        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_parse_track_list_with_segment_paths() {
        let raw = r#"[
            {"path": "downloads/segment_0.mp3", "track_title": "A", "artist": "X", "start": "0", "end": "60"},
            {"path": "downloads/segment_60.mp3", "track_title": "A", "artist": "X", "start": "60", "end": "120"}
        ]"#;

        let entries: Vec<TrackListEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].start_seconds().unwrap(), 60);
        assert_eq!(entries[1].end_seconds().unwrap(), 120);
    }

    #[test]
    fn test_invalid_time_is_reported() {
        let entry = SetlistEntry {
            track_title: "A".to_string(),
            artist: "X".to_string(),
            start: "soon".to_string(),
            end: "60".to_string(),
        };

        match entry.start_seconds() {
            Err(FormatError::InvalidTime { field, value }) => {
                assert_eq!(field, "start");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
