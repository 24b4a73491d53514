use crate::error::AnalysisError;

/// A complete mono recording handed to the pipeline.
///
/// Samples are f32 in [-1.0, 1.0]. The buffer is moved into
/// `analysis::analyze` and dropped when the call returns; nothing
/// keeps a reference to it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Duration reported by the producer. Duration-based rules read this,
    /// not the sample count.
    pub duration_ms: u64,
}

impl AudioBuffer {
    /// Mono buffer whose duration is derived from its length.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        let duration_ms = if sample_rate == 0 {
            0
        } else {
            samples.len() as u64 * 1000 / sample_rate as u64
        };

        Self {
            samples,
            sample_rate,
            channels: 1,
            duration_ms,
        }
    }

    /// Override the duration with the value the producer measured.
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_ms as f32 / 1000.0
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check the shape preconditions: mono, non-zero sample rate.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.channels != 1 {
            return Err(AnalysisError::NotMono {
                channels: self.channels,
            });
        }
        if self.sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        Ok(())
    }
}

/// Average interleaved multi-channel samples down to mono.
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
