use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::features::AcousticFeatures;
use crate::dsp::stats::linear_map;

/// Below this signal quality the raw scores are attenuated.
pub const QUALITY_GUARD: f32 = 0.25;

/// Ceiling applied to every score when the guardrail engages.
pub const GUARDED_SCORE_CAP: f32 = 35.0;

/// Frames quieter than this RMS are treated as near-silence.
pub const QUIET_RMS: f32 = 0.015;

/// Three bounded state signals, each an integer in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceScores {
    pub energy: u8,
    pub tension: u8,
    pub clarity: u8,
}

/// How far the scores can be trusted given the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(label)
    }
}

/// Unrounded scores before the guardrail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScores {
    pub energy: f32,
    pub tension: f32,
    pub clarity: f32,
}

/// Map `v` from [lo, hi] onto [0, 100], clamped.
pub fn normalize(v: f32, lo: f32, hi: f32) -> f32 {
    linear_map(v, lo, hi, 0.0, 100.0).clamp(0.0, 100.0)
}

/// Weighted feature blends. Weights and calibration bounds are fixed.
///
///   energy  = 0.7·loudness + 0.3·brightness
///   tension = 0.6·pitch variability + 0.2·jitter + 0.2·zcr
///   clarity = 0.5·(100 - noisiness) + 0.3·voicing + 0.2·centroid near 1800 Hz
pub fn raw_scores(f: &AcousticFeatures) -> RawScores {
    let energy = normalize(f.rms, 0.01, 0.25) * 0.7 + normalize(f.spectral_centroid, 500.0, 3500.0) * 0.3;

    let tension = normalize(f.pitch_variance, 0.05, 0.25) * 0.6
        + normalize(f.jitter_proxy, 0.01, 0.08) * 0.2
        + normalize(f.zero_crossing_rate, 0.05, 0.18) * 0.2;

    let centroid_balance =
        (100.0 - ((f.spectral_centroid - 1800.0).abs() / 1800.0) * 50.0).clamp(0.0, 100.0);
    let clarity = (100.0 - normalize(f.zero_crossing_rate, 0.05, 0.2)) * 0.5
        + (f.voiced_ratio * 100.0) * 0.3
        + centroid_balance * 0.2;

    RawScores {
        energy,
        tension,
        clarity,
    }
}

/// Trust factor in [0, 1] combining loudness and voicing.
///
///   quality = ramp(rms, 0.015 → 0.05) · ramp(voiced_ratio, 0.1 → 0.4)
pub fn signal_quality(f: &AcousticFeatures) -> f32 {
    let loudness = linear_map(f.rms, QUIET_RMS, 0.05, 0.0, 1.0).clamp(0.0, 1.0);
    let voicing = linear_map(f.voiced_ratio, 0.1, 0.4, 0.0, 1.0).clamp(0.0, 1.0);
    loudness * voicing
}

/// Map features to bounded scores.
///
/// When signal quality is below 0.25 each raw score is scaled by the quality
/// and capped at 35, so silence or non-voice input can't read as high
/// energy or high tension.
pub fn score(f: &AcousticFeatures) -> VoiceScores {
    let raw = raw_scores(f);
    let quality = signal_quality(f);

    let adjust = |r: f32| {
        if quality < QUALITY_GUARD {
            (r * quality).min(GUARDED_SCORE_CAP)
        } else {
            r
        }
    };

    if quality < QUALITY_GUARD {
        warn!(quality, "low signal quality, attenuating scores");
    }

    let scores = VoiceScores {
        energy: round_score(adjust(raw.energy)),
        tension: round_score(adjust(raw.tension)),
        clarity: round_score(adjust(raw.clarity)),
    };

    debug!(
        quality,
        energy = scores.energy,
        tension = scores.tension,
        clarity = scores.clarity,
        "scores computed"
    );

    scores
}

/// Confidence label, first matching rule wins:
///
///   rms < 0.015                      → low
///   duration < 3 s                   → low
///   voiced ratio < 0.1               → low
///   rms < 0.03 or voiced ratio < 0.3 → medium
///   otherwise                        → high
pub fn confidence(f: &AcousticFeatures) -> Confidence {
    if f.rms < QUIET_RMS || f.duration_seconds < 3.0 || f.voiced_ratio < 0.1 {
        Confidence::Low
    } else if f.rms < 0.03 || f.voiced_ratio < 0.3 {
        Confidence::Medium
    } else {
        Confidence::High
    }
}

/// Clamp to [0, 100] and round half-up.
fn round_score(raw: f32) -> u8 {
    (raw.clamp(0.0, 100.0) + 0.5).floor() as u8
}
