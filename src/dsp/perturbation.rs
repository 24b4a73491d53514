use super::stats;

/// Frame-level jitter proxy from voiced pitch estimates.
///
/// Clinical jitter compares consecutive glottal periods. At a 512-sample hop
/// we only have one pitch per frame, so this is the mean relative change
/// between consecutive voiced frame pitches:
///
///   mean(|p[i] - p[i-1]| / ((p[i] + p[i-1]) / 2))
///
/// `voiced_pitches` is the voiced subset in frame order; unvoiced frames are
/// already dropped, so neighbours across a gap are compared. Capped at 1.0.
pub fn jitter_proxy(voiced_pitches: &[f32]) -> f32 {
    stats::mean_relative_delta(voiced_pitches).min(1.0)
}

/// Frame-level shimmer proxy from the full per-frame RMS sequence.
///
/// Same relative-difference formula as `jitter_proxy`, but over every frame,
/// voiced or not: amplitude is meaningful in unvoiced frames where pitch is
/// not. Not capped; typical speech stays well below 1.
pub fn shimmer_proxy(frame_rms: &[f32]) -> f32 {
    stats::mean_relative_delta(frame_rms)
}
