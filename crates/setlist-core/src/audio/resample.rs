//! Audio resampling using linear interpolation
//!
//! Recognition services accept low-rate mono input, so segments are
//! downsampled before being written.

use anyhow::Result;

/// Resample mono audio to the target sample rate
pub fn resample_to_target(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        anyhow::bail!("Sample rates must be > 0 (from {} to {})", from_rate, to_rate);
    }
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        if src_idx + 1 < samples.len() {
            output.push(samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac);
        } else if src_idx < samples.len() {
            output.push(samples[src_idx]);
        }
    }

    Ok(output)
}
