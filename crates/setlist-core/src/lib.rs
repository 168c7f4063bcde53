//! Setlist Core - segment recognition and setlist melting
//!
//! Splits a long mix into fixed windows, identifies each window with a
//! recognition service, and melts consecutive identical recognitions into
//! setlist runs.

pub mod audio;
pub mod config;
pub mod download;
pub mod error;
pub mod melt;
pub mod model;
pub mod pipeline;
pub mod recognizer;
pub mod segmentation;

pub use audio::WavSlicer;
pub use config::{OutputConfig, RecognitionConfig, ServerConfig, SetlistConfig, SoundCloudConfig};
pub use download::{Downloader, YtDlpDownloader};
pub use error::{CoreError, PipelineError, RecognizeError};
pub use melt::melt;
pub use model::{RecognitionRecord, Run, UNKNOWN};
pub use pipeline::{
    melt_track_list_file, LoadedAudio, Pipeline, PipelineOptions, PipelineReport, SegmentSlicer,
};
pub use recognizer::{AuddRecognizer, Recognition, Recognizer};
pub use segmentation::{segment_windows, SegmentWindow};
