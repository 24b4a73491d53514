use std::f32::consts::PI;

/// Hann coefficient for position `i` of an `n`-point window.
///
/// w(i) = 0.5 * (1 - cos(2π * i / (n - 1)))
///
/// Both ends are 0 and the centre is 1. Windows of length 0 or 1 are
/// treated as rectangular (coefficient 1) since the formula divides by n - 1.
pub fn hann_coefficient(i: usize, n: usize) -> f32 {
    if n <= 1 {
        return 1.0;
    }
    0.5 * (1.0 - (2.0 * PI * i as f32 / (n - 1) as f32).cos())
}

/// Multiply a frame by a Hann window in place.
pub fn hann_in_place(frame: &mut [f32]) {
    let n = frame.len();
    for (i, s) in frame.iter_mut().enumerate() {
        *s *= hann_coefficient(i, n);
    }
}

/// Return a Hann-windowed copy of `samples`.
pub fn hann(samples: &[f32]) -> Vec<f32> {
    let mut out = samples.to_vec();
    hann_in_place(&mut out);
    out
}
