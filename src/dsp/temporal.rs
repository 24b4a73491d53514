/// Per-frame time-domain measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalFrame {
    /// Root-mean-square amplitude (linear, not dB).
    pub rms: f32,
    /// Fraction of adjacent sample pairs that change sign (0.0 to 1.0).
    pub zcr: f32,
}

/// Computes RMS energy and zero-crossing rate for a frame.
pub fn analyze(frame: &[f32]) -> TemporalFrame {
    TemporalFrame {
        rms: rms(frame),
        zcr: zero_crossing_rate(frame),
    }
}

/// RMS of a sample buffer. 0 for empty input.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Zero-crossing rate: sign changes divided by (N - 1).
///
/// Zero counts as non-negative, so a run of zeros never crosses.
/// Frames shorter than two samples have no pairs and return 0.
pub fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }

    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();

    crossings as f32 / (samples.len() - 1) as f32
}
