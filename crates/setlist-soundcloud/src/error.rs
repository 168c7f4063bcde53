//! Error types for metadata resolution

/// Result type alias for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Failures surfaced by the resolver
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Request rejected before any upstream call
    #[error("{0}")]
    InvalidInput(String),

    /// Upstream has no such track or playlist
    #[error("not found")]
    NotFound,

    /// Timeout, connection failure or non-2xx answer from upstream
    #[error("SoundCloud unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Track page fetched but its data could not be extracted
    #[error("Scraping failed: {0}")]
    ScrapeError(String),
}

impl MetadataError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn scrape_error(msg: impl Into<String>) -> Self {
        Self::ScrapeError(msg.into())
    }
}

impl From<reqwest::Error> for MetadataError {
    fn from(e: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(e.to_string())
    }
}
