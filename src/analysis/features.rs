use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::dsp::pitch::PitchTracker;
use crate::dsp::spectral::SpectralAnalyzer;
use crate::dsp::{framing, perturbation, stats, temporal};
use crate::error::AnalysisError;

/// Buffer-level acoustic features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    /// Mean frame RMS amplitude
    pub rms: f32,
    /// Mean F0 over voiced frames in Hz, 0 if none
    pub pitch_mean: f32,
    /// Coefficient of variation of voiced F0 (std / mean)
    pub pitch_variance: f32,
    /// Mean per-frame spectral centroid in Hz
    pub spectral_centroid: f32,
    /// Mean per-frame zero-crossing rate
    pub zero_crossing_rate: f32,
    /// Fraction of frames classified voiced
    pub voiced_ratio: f32,
    /// Mean relative frame-to-frame pitch change, capped at 1
    pub jitter_proxy: f32,
    /// Mean relative frame-to-frame RMS change
    pub shimmer_proxy: f32,
    /// Buffer duration from its metadata
    pub duration_seconds: f32,
}

/// Turns an `AudioBuffer` into `AcousticFeatures`.
///
/// Time-domain, spectral and pitch analysis all run over the same frame
/// grid (1024 samples, hop 512 by default). The pitch tracker makes its own
/// pass over the buffer rather than sharing the per-frame loop.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    frame_size: usize,
    hop_size: usize,
    tracker: PitchTracker,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl FeatureExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            tracker: PitchTracker::new(config.into()),
        }
    }

    /// Extract features from a complete mono buffer.
    ///
    /// Fails only on precondition violations: non-mono input, a zero sample
    /// rate, or a buffer shorter than one frame. Everything past that point
    /// is total, so silence comes back as all-zero features.
    pub fn extract(&self, buffer: &AudioBuffer) -> Result<AcousticFeatures, AnalysisError> {
        buffer.validate()?;

        if self.frame_size < 2 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidFraming {
                frame_size: self.frame_size,
                hop_size: self.hop_size,
            });
        }

        let frame_count = framing::frame_count(buffer.len(), self.frame_size, self.hop_size);
        if frame_count == 0 {
            return Err(AnalysisError::BufferTooShort {
                samples: buffer.len(),
                frame_size: self.frame_size,
            });
        }

        let spectral = SpectralAnalyzer::new(buffer.sample_rate);

        let mut frame_rms = Vec::with_capacity(frame_count);
        let mut frame_zcr = Vec::with_capacity(frame_count);
        let mut frame_centroid = Vec::with_capacity(frame_count);

        for frame in framing::frames(&buffer.samples, self.frame_size, self.hop_size) {
            let td = temporal::analyze(frame);
            frame_rms.push(td.rms);
            frame_zcr.push(td.zcr);
            frame_centroid.push(spectral.analyze(frame)?.centroid_hz);
        }

        let track = self.tracker.track_frames(
            &buffer.samples,
            buffer.sample_rate,
            self.frame_size,
            self.hop_size,
        );
        let voiced_pitches = track.voiced_pitches();

        let features = AcousticFeatures {
            rms: stats::mean(&frame_rms),
            pitch_mean: stats::mean(&voiced_pitches),
            pitch_variance: stats::coefficient_of_variation(&voiced_pitches),
            spectral_centroid: stats::mean(&frame_centroid),
            zero_crossing_rate: stats::mean(&frame_zcr),
            voiced_ratio: track.voiced_ratio(),
            jitter_proxy: perturbation::jitter_proxy(&voiced_pitches),
            shimmer_proxy: perturbation::shimmer_proxy(&frame_rms),
            duration_seconds: buffer.duration_secs(),
        };

        debug!(
            frames = frame_count,
            rms = features.rms,
            pitch_mean = features.pitch_mean,
            voiced_ratio = features.voiced_ratio,
            centroid = features.spectral_centroid,
            "features extracted"
        );

        Ok(features)
    }
}
