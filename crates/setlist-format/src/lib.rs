//! Setlist artifact formats
//!
//! JSON files written by the recognition pipeline: the raw per-segment
//! track list and the melted setlist.

pub mod json_format;

pub use json_format::{
    load_setlist, load_track_list, save_setlist, save_track_list, FormatError, SetlistEntry,
    TrackListEntry,
};
