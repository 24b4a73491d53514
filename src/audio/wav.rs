use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};
use tracing::debug;

use super::buffer::{self, AudioBuffer};

/// Load a WAV file into an `AudioBuffer`.
///
/// Integer PCM is scaled to [-1.0, 1.0]; float PCM is taken as-is.
/// Multi-channel files are rejected unless `downmix` is set, in which case
/// channels are averaged to mono.
pub fn load_buffer(path: &Path, downmix: bool) -> Result<AudioBuffer> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();

    if spec.channels != 1 && !downmix {
        anyhow::bail!(
            "{} has {} channels; analysis needs a mono recording (use --downmix to average channels)",
            path.display(),
            spec.channels
        );
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<hound::Result<Vec<_>>>()
                .context("Failed to read WAV samples")?
        }
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<hound::Result<Vec<_>>>()
            .context("Failed to read WAV samples")?,
    };

    let samples = buffer::downmix(&interleaved, spec.channels);

    debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "loaded wav"
    );

    Ok(AudioBuffer::new(samples, spec.sample_rate))
}
