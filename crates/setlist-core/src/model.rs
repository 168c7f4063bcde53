//! Recognition records and melted runs

use serde::{Deserialize, Serialize};
use setlist_format::{SetlistEntry, TrackListEntry};

use crate::error::CoreError;

/// Placeholder title/artist for a segment that could not be identified.
///
/// Distinct from a missing value: consecutive sentinel segments melt into
/// one run like any other repeated recognition.
pub const UNKNOWN: &str = "Unknown";

/// Recognition result for one analyzed window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionRecord {
    /// Inclusive start of the window in seconds
    pub segment_start: u64,
    /// Exclusive end of the window in seconds
    pub segment_end: u64,
    pub track_title: String,
    pub artist: String,
    /// Originating segment, for diagnostics only
    pub source_path: String,
}

impl RecognitionRecord {
    pub fn new(
        segment_start: u64,
        segment_end: u64,
        track_title: impl Into<String>,
        artist: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Self {
        Self {
            segment_start,
            segment_end,
            track_title: track_title.into(),
            artist: artist.into(),
            source_path: source_path.into(),
        }
    }

    /// Record for a window whose recognition failed or found nothing
    pub fn unknown(segment_start: u64, segment_end: u64, source_path: impl Into<String>) -> Self {
        Self::new(segment_start, segment_end, UNKNOWN, UNKNOWN, source_path)
    }

    pub fn is_unknown(&self) -> bool {
        self.track_title == UNKNOWN && self.artist == UNKNOWN
    }

    /// Parse a persisted track list entry, checking the window bounds
    pub fn from_entry(index: usize, entry: &TrackListEntry) -> Result<Self, CoreError> {
        let start = entry.start_seconds()?;
        let end = entry.end_seconds()?;
        if end <= start {
            return Err(CoreError::InvalidRecord {
                index,
                reason: format!("end {} is not after start {}", end, start),
            });
        }
        Ok(Self::new(start, end, &entry.track_title, &entry.artist, &entry.path))
    }

    pub fn to_entry(&self) -> TrackListEntry {
        TrackListEntry::new(
            &self.source_path,
            &self.track_title,
            &self.artist,
            self.segment_start,
            self.segment_end,
        )
    }
}

/// A maximal block of consecutive records sharing title and artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub track_title: String,
    pub artist: String,
    pub start: u64,
    pub end: u64,
}

impl Run {
    /// Open a run from its first record
    pub fn from_record(record: &RecognitionRecord) -> Self {
        Self {
            track_title: record.track_title.clone(),
            artist: record.artist.clone(),
            start: record.segment_start,
            end: record.segment_end,
        }
    }

    pub fn matches(&self, record: &RecognitionRecord) -> bool {
        self.track_title == record.track_title && self.artist == record.artist
    }

    pub fn duration_seconds(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn to_entry(&self) -> SetlistEntry {
        SetlistEntry::new(&self.track_title, &self.artist, self.start, self.end)
    }
}
