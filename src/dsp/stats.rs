//! Small statistics helpers shared by the feature extractor.
//!
//! Every function here is total: empty input or a zero denominator yields
//! 0 rather than NaN.

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population standard deviation, 0 for an empty slice.
pub fn population_std(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|&v| (v - m).powi(2)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

/// Coefficient of variation: population std / mean.
///
/// 0 when there are fewer than two values or the mean is 0.
pub fn coefficient_of_variation(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    population_std(values) / m
}

/// Mean relative difference between consecutive values:
///
///   mean(|v[i] - v[i-1]| / ((v[i] + v[i-1]) / 2))
///
/// Pairs whose average is 0 are skipped. 0 when no pair qualifies.
pub fn mean_relative_delta(values: &[f32]) -> f32 {
    let deltas: Vec<f32> = values
        .windows(2)
        .filter_map(|pair| {
            let avg = (pair[0] + pair[1]) / 2.0;
            (avg != 0.0).then(|| (pair[1] - pair[0]).abs() / avg)
        })
        .collect();

    mean(&deltas)
}

/// Linearly map `v` from [in_lo, in_hi] onto [out_lo, out_hi] without clamping.
pub fn linear_map(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    if in_hi == in_lo {
        return out_lo;
    }
    out_lo + (v - in_lo) * (out_hi - out_lo) / (in_hi - in_lo)
}
