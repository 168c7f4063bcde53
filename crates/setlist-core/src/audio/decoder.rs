//! Audio decoding to mono f32 samples

use super::{resample_to_target, AudioFormat};
use anyhow::{Context, Result};
use std::path::Path;

/// Decoded audio data
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_ms: u64,
}

impl AudioData {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let frames = samples.len() as u64 / channels.max(1) as u64;
        let duration_ms = if sample_rate == 0 {
            0
        } else {
            frames * 1000 / sample_rate as u64
        };
        Self {
            samples,
            sample_rate,
            channels,
            duration_ms,
        }
    }

    /// Convert to mono by averaging channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }

        self.samples
            .chunks(self.channels as usize)
            .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
            .collect()
    }

    /// Whole seconds of audio, rounded up so a trailing partial second
    /// still gets a window
    pub fn duration_seconds(&self) -> u64 {
        self.duration_ms.div_ceil(1000)
    }
}

/// Decode an audio file to mono at the target sample rate
pub fn decode_audio(path: &Path, target_sample_rate: u32) -> Result<AudioData> {
    if !path.exists() {
        anyhow::bail!("Audio file not found: {}", path.display());
    }

    let audio_data = match AudioFormat::from_path(path) {
        AudioFormat::Wav => decode_wav(path)?,
        AudioFormat::Mp3 => decode_mp3(path)?,
        AudioFormat::Other => super::decode_with_symphonia(path)?,
    };

    log::debug!(
        "Decoded {}: {} Hz, {} channel(s), {} ms",
        path.display(),
        audio_data.sample_rate,
        audio_data.channels,
        audio_data.duration_ms
    );

    let mono = audio_data.to_mono();
    let samples = resample_to_target(&mono, audio_data.sample_rate, target_sample_rate)?;

    Ok(AudioData::new(samples, target_sample_rate, 1))
}

/// Decode WAV file
fn decode_wav(path: &Path) -> Result<AudioData> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(AudioData::new(samples, spec.sample_rate, spec.channels))
}

/// Decode MP3 file
fn decode_mp3(path: &Path) -> Result<AudioData> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read MP3 file: {}", path.display()))?;

    let mut decoder = minimp3::Decoder::new(&data[..]);
    let mut samples = Vec::new();
    let mut sample_rate = 0;
    let mut channels = 0;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate == 0 {
                    sample_rate = frame.sample_rate as u32;
                    channels = frame.channels as u16;
                }
                samples.extend(frame.data.iter().map(|&s| s as f32 / 32768.0));
            }
            Err(minimp3::Error::Eof) => break,
            // Garbage between frames (ID3 tags, padding) is skipped by the decoder
            Err(minimp3::Error::SkippedData) => continue,
            Err(e) => anyhow::bail!("MP3 decode error in {}: {}", path.display(), e),
        }
    }

    if sample_rate == 0 {
        anyhow::bail!("No MP3 frames found in {}", path.display());
    }

    Ok(AudioData::new(samples, sample_rate, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_mono_averages_channels() {
        let audio = AudioData::new(vec![1.0, 0.0, 0.5, 0.5], 2, 2);
        assert_eq!(audio.to_mono(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_duration_rounds_partial_second_up() {
        let audio = AudioData::new(vec![0.0; 16000 * 150 + 8000], 16000, 1);
        assert_eq!(audio.duration_ms, 150_500);
        assert_eq!(audio.duration_seconds(), 151);
    }

    #[test]
    fn test_decode_wav_downmixes_and_resamples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 32000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..32000 * 2 {
            writer.write_sample(1000i16).unwrap();
            writer.write_sample(-1000i16).unwrap();
        }
        writer.finalize().unwrap();

        let audio = decode_audio(&path, 16000).unwrap();

        assert_eq!(audio.channels, 1);
        assert_eq!(audio.sample_rate, 16000);
        assert_eq!(audio.duration_seconds(), 2);
        assert!(audio.samples.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(decode_audio(Path::new("/nonexistent/track.mp3"), 16000).is_err());
    }
}
