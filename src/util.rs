use std::f32::consts::PI;

/// Peak amplitude in dB relative to full scale.
/// Returns -infinity for all-zero input.
pub fn peak_db(samples: &[f32]) -> f32 {
    let peak = samples.iter().fold(0.0_f32, |max, &s| max.max(s.abs()));

    if peak == 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * peak.log10()
    }
}

/// Convert a linear RMS amplitude to dBFS.
/// Returns -infinity for 0.
pub fn rms_db(rms: f32) -> f32 {
    if rms <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * rms.log10()
    }
}

/// Synthesize a sine tone, used by the `tone` command.
pub fn sine_tone(freq_hz: f32, amplitude: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * secs.max(0.0)) as usize;
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}
