//! Error types for segment recognition and the pipeline

use thiserror::Error;

/// Errors from the deterministic core
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("chunk size must be a positive number of seconds")]
    InvalidChunkSize,

    #[error("invalid record at position {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error(transparent)]
    Format(#[from] setlist_format::FormatError),
}

/// Errors from a single recognition call
///
/// The pipeline never propagates these; they degrade the segment to the
/// sentinel record.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("recognition request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("recognition service error: {0}")]
    Service(String),

    #[error("unreadable segment {path}: {source}")]
    Segment {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("audio error: {0}")]
    Audio(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Format(#[from] setlist_format::FormatError),
}
