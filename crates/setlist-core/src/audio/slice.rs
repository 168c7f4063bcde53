//! Writing segment windows to WAV files

use super::{decode_audio, AudioData};
use crate::error::PipelineError;
use crate::pipeline::{LoadedAudio, SegmentSlicer};
use crate::segmentation::SegmentWindow;
use anyhow::Context;
use async_trait::async_trait;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Write one window of mono audio as 16-bit PCM WAV
///
/// The sample range is clipped to the decoded audio, so the final window of
/// a track produces a short file rather than padding.
pub fn write_window_wav(audio: &AudioData, window: &SegmentWindow, path: &Path) -> anyhow::Result<()> {
    let rate = audio.sample_rate as u64;
    let channels = audio.channels.max(1) as u64;
    let start = ((window.start * rate * channels) as usize).min(audio.samples.len());
    let end = ((window.end * rate * channels) as usize).min(audio.samples.len());

    let spec = hound::WavSpec {
        channels: audio.channels.max(1),
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create segment file: {}", path.display()))?;
    for &sample in &audio.samples[start..end] {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Decoded source audio ready to be cut into windows
pub struct DecodedAudio {
    audio: AudioData,
}

impl DecodedAudio {
    pub fn new(audio: AudioData) -> Self {
        Self { audio }
    }
}

impl LoadedAudio for DecodedAudio {
    fn duration_seconds(&self) -> u64 {
        self.audio.duration_seconds()
    }

    fn write_segments(
        &self,
        windows: &[SegmentWindow],
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let paths = windows
            .par_iter()
            .map(|window| {
                let path = dest_dir.join(window.file_name());
                write_window_wav(&self.audio, window, &path)?;
                log::debug!("Wrote {} ({}s - {}s)", path.display(), window.start, window.end);
                Ok::<_, anyhow::Error>(path)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(paths)
    }
}

/// Slicer that decodes the download in-process and writes WAV segments
#[derive(Debug, Clone)]
pub struct WavSlicer {
    sample_rate: u32,
}

impl WavSlicer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

#[async_trait]
impl SegmentSlicer for WavSlicer {
    async fn load(&self, source: &Path) -> Result<Arc<dyn LoadedAudio>, PipelineError> {
        let source = source.to_path_buf();
        let sample_rate = self.sample_rate;

        let audio = tokio::task::spawn_blocking(move || decode_audio(&source, sample_rate))
            .await
            .map_err(|e| anyhow::anyhow!("Decoder task failed: {}", e))??;

        log::info!(
            "Decoded source: {:.1}s, {} samples @ {}Hz",
            audio.duration_ms as f64 / 1000.0,
            audio.samples.len(),
            audio.sample_rate
        );

        Ok(Arc::new(DecodedAudio::new(audio)))
    }
}
