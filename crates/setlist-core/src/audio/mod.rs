//! Audio decoding, resampling and segment slicing
//!
//! WAV is read with hound, MP3 with minimp3, and every other container
//! (m4a, flac, ogg, ...) through Symphonia.

mod container;
mod decoder;
mod resample;
mod slice;

pub use container::decode_with_symphonia;
pub use decoder::{decode_audio, AudioData};
pub use resample::resample_to_target;
pub use slice::{write_window_wav, DecodedAudio, WavSlicer};

use std::path::Path;

/// Input formats with a dedicated decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    /// Anything else is handed to Symphonia's probe
    Other,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("wav") | Some("wave") => AudioFormat::Wav,
            Some("mp3") => AudioFormat::Mp3,
            _ => AudioFormat::Other,
        }
    }
}
