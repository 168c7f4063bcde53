//! Fixed-length segmentation of a track timeline
//!
//! Windows are back-to-back with no overlap, starting at 0. The last window
//! keeps its full length even when it runs past the end of the track; reads
//! of actual audio are clipped by the slicer, not here.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One window of the source timeline, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentWindow {
    /// Window identifier (0-based)
    pub index: usize,
    /// Inclusive start
    pub start: u64,
    /// Exclusive end
    pub end: u64,
}

impl SegmentWindow {
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// File name used for this window's audio artifact
    pub fn file_name(&self) -> String {
        format!("segment_{}.wav", self.start)
    }
}

/// Produce the windows covering `total_duration_seconds`
pub fn segment_windows(
    total_duration_seconds: u64,
    chunk_seconds: u64,
) -> Result<Vec<SegmentWindow>, CoreError> {
    if chunk_seconds == 0 {
        return Err(CoreError::InvalidChunkSize);
    }

    let windows = (0..total_duration_seconds)
        .step_by(chunk_seconds as usize)
        .enumerate()
        .map(|(index, start)| SegmentWindow {
            index,
            start,
            end: start + chunk_seconds,
        })
        .collect();

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(windows: &[SegmentWindow]) -> Vec<(u64, u64)> {
        windows.iter().map(|w| (w.start, w.end)).collect()
    }

    #[test]
    fn test_last_window_may_exceed_duration() {
        let windows = segment_windows(150, 60).unwrap();
        assert_eq!(bounds(&windows), vec![(0, 60), (60, 120), (120, 180)]);
        assert_eq!(windows[2].index, 2);
    }

    #[test]
    fn test_exact_multiple() {
        let windows = segment_windows(120, 60).unwrap();
        assert_eq!(bounds(&windows), vec![(0, 60), (60, 120)]);
    }

    #[test]
    fn test_zero_duration_yields_nothing() {
        assert!(segment_windows(0, 60).unwrap().is_empty());
    }

    #[test]
    fn test_zero_chunk_is_rejected() {
        assert!(matches!(segment_windows(100, 0), Err(CoreError::InvalidChunkSize)));
    }

    #[test]
    fn test_windows_are_contiguous() {
        let windows = segment_windows(3601, 25).unwrap();
        assert_eq!(windows.len(), 145);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].duration(), 25);
        }
    }
}
