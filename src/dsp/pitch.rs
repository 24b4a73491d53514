use std::fmt;
use std::str::FromStr;

use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{framing, windowing};

/// A frame is voiced when the estimator's confidence exceeds this.
pub const VOICED_CONFIDENCE: f32 = 0.5;

/// Which per-frame estimator the tracker runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchMethod {
    /// Cumulative-mean-normalized difference function (YIN-style).
    #[default]
    Yin,
    /// Plain normalized autocorrelation. Coarser: no sub-sample refinement.
    Autocorrelation,
    /// McLeod Pitch Method via the `pitch-detection` crate.
    Mcleod,
}

impl fmt::Display for PitchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PitchMethod::Yin => "yin",
            PitchMethod::Autocorrelation => "autocorrelation",
            PitchMethod::Mcleod => "mcleod",
        };
        f.write_str(name)
    }
}

impl FromStr for PitchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yin" => Ok(PitchMethod::Yin),
            "autocorrelation" | "acf" => Ok(PitchMethod::Autocorrelation),
            "mcleod" | "mpm" => Ok(PitchMethod::Mcleod),
            other => Err(format!(
                "unknown pitch method '{other}' (expected yin, autocorrelation or mcleod)"
            )),
        }
    }
}

/// Configuration for pitch estimation.
#[derive(Debug, Clone)]
pub struct PitchConfig {
    /// Lowest frequency searched, in Hz.
    pub pitch_floor_hz: f32,

    /// Highest frequency searched, in Hz.
    pub pitch_ceiling_hz: f32,

    /// A lag qualifies once its normalized difference drops below this.
    /// Lower = stricter periodicity requirement.
    pub yin_threshold: f32,

    /// Estimator used per frame.
    pub method: PitchMethod,

    /// Autocorrelation: minimum lag correlation (relative to zero-lag
    /// energy) for a frame to count as voiced.
    pub min_correlation: f32,

    /// McLeod power threshold — filters out low-energy frames.
    pub mcleod_power_threshold: f64,

    /// McLeod clarity threshold (0.0-1.0).
    pub mcleod_clarity_threshold: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            // 50-600 Hz covers low male speech through raised female/child voices.
            pitch_floor_hz: 50.0,
            pitch_ceiling_hz: 600.0,
            yin_threshold: 0.15,
            method: PitchMethod::Yin,
            min_correlation: 0.3,
            mcleod_power_threshold: 0.2,
            mcleod_clarity_threshold: 0.5,
        }
    }
}

/// Pitch estimate for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Estimated F0 in Hz, 0 when no candidate was found.
    pub pitch_hz: f32,
    /// Estimator confidence in [0, 1].
    pub confidence: f32,
    pub is_voiced: bool,
}

impl PitchEstimate {
    pub fn unvoiced() -> Self {
        Self {
            pitch_hz: 0.0,
            confidence: 0.0,
            is_voiced: false,
        }
    }
}

/// Per-frame pitch over a whole buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchTrack {
    /// Pitch per frame in Hz; 0 for unvoiced frames.
    pub pitches: Vec<f32>,
    /// Estimator confidence per frame.
    pub confidences: Vec<f32>,
    pub voiced_frames: usize,
    pub total_frames: usize,
}

impl PitchTrack {
    /// Pitches of voiced frames only, in frame order.
    pub fn voiced_pitches(&self) -> Vec<f32> {
        self.pitches.iter().copied().filter(|&p| p > 0.0).collect()
    }

    /// Fraction of frames that are voiced. 0 if there are no frames.
    pub fn voiced_ratio(&self) -> f32 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.voiced_frames as f32 / self.total_frames as f32
    }
}

/// Fundamental-frequency estimator.
///
/// Stateless apart from its configuration, so one tracker can be shared
/// across threads and buffers.
#[derive(Debug, Clone, Default)]
pub struct PitchTracker {
    config: PitchConfig,
}

impl PitchTracker {
    pub fn new(config: PitchConfig) -> Self {
        Self { config }
    }

    /// Estimate the pitch of one frame with the configured method.
    pub fn estimate(&self, frame: &[f32], sample_rate: u32) -> PitchEstimate {
        match self.config.method {
            PitchMethod::Yin => self.estimate_yin(frame, sample_rate),
            PitchMethod::Autocorrelation => self.estimate_autocorrelation(frame, sample_rate),
            PitchMethod::Mcleod => self.estimate_mcleod(frame, sample_rate),
        }
    }

    /// Difference-function pitch estimate (YIN-style).
    ///
    /// 1. d(τ) = Σ (x[i] - x[i+τ])²
    /// 2. cmnd(0) = 1, cmnd(τ) = d(τ) / ((1/τ) Σ_{t=1..τ} d(t))
    /// 3. Take the first τ in the lag range with cmnd(τ) < threshold that is
    ///    also a strict local minimum
    /// 4. Refine τ with a parabola through τ-1, τ, τ+1
    ///
    /// confidence = 1 - cmnd(τ); voiced when confidence > 0.5.
    pub fn estimate_yin(&self, frame: &[f32], sample_rate: u32) -> PitchEstimate {
        let Some((min_lag, max_lag)) = self.lag_range(frame.len(), sample_rate) else {
            return PitchEstimate::unvoiced();
        };

        // Lags past max_lag + 1 never influence the search, so stop there.
        let last_tau = (max_lag + 1).min(frame.len() - 1);
        let diff = difference_function(frame, last_tau);
        let cmnd = cumulative_mean_normalized(&diff);

        for tau in min_lag..=max_lag {
            let Some(&next) = cmnd.get(tau + 1) else {
                break;
            };
            let prev = cmnd[tau - 1];
            let cur = cmnd[tau];

            if cur < self.config.yin_threshold && prev > cur && cur < next {
                let refined = parabolic_vertex(prev, cur, next, tau as f32);
                let confidence = (1.0 - cur).clamp(0.0, 1.0);
                trace!(tau, refined, confidence, "yin candidate");

                return PitchEstimate {
                    pitch_hz: sample_rate as f32 / refined,
                    confidence,
                    is_voiced: confidence > VOICED_CONFIDENCE,
                };
            }
        }

        PitchEstimate::unvoiced()
    }

    /// Normalized-autocorrelation pitch estimate.
    ///
    /// Picks the lag maximizing Σ x[i]·x[i+lag] and normalizes it by the
    /// zero-lag energy. Voiced when that correlation exceeds
    /// `min_correlation` and the frequency is inside the band.
    pub fn estimate_autocorrelation(&self, frame: &[f32], sample_rate: u32) -> PitchEstimate {
        let Some((min_lag, max_lag)) = self.lag_range(frame.len(), sample_rate) else {
            return PitchEstimate::unvoiced();
        };

        let energy: f32 = frame.iter().map(|&s| s * s).sum();
        if energy == 0.0 {
            return PitchEstimate::unvoiced();
        }

        let mut best_lag = min_lag;
        let mut best_corr = f32::NEG_INFINITY;
        for lag in min_lag..=max_lag {
            let corr: f32 = frame[..frame.len() - lag]
                .iter()
                .zip(&frame[lag..])
                .map(|(&a, &b)| a * b)
                .sum();
            if corr > best_corr {
                best_corr = corr;
                best_lag = lag;
            }
        }

        let normalized = best_corr / energy;
        let pitch_hz = sample_rate as f32 / best_lag as f32;
        let is_voiced = normalized > self.config.min_correlation && self.in_band(pitch_hz);

        PitchEstimate {
            pitch_hz,
            confidence: normalized.clamp(0.0, 1.0),
            is_voiced,
        }
    }

    /// McLeod Pitch Method estimate.
    ///
    /// The frame is Hann-windowed and handed to the `pitch-detection`
    /// detector. Clarity doubles as confidence; frequencies outside the
    /// band are rejected.
    pub fn estimate_mcleod(&self, frame: &[f32], sample_rate: u32) -> PitchEstimate {
        if frame.len() < 4 || sample_rate == 0 {
            return PitchEstimate::unvoiced();
        }

        let windowed: Vec<f64> = windowing::hann(frame).iter().map(|&s| s as f64).collect();
        let mut detector = McLeodDetector::new(windowed.len(), windowed.len() / 2);

        let pitch = detector.get_pitch(
            &windowed,
            sample_rate as usize,
            self.config.mcleod_power_threshold,
            self.config.mcleod_clarity_threshold,
        );

        match pitch {
            Some(p) => {
                let pitch_hz = p.frequency as f32;
                PitchEstimate {
                    pitch_hz,
                    confidence: (p.clarity as f32).clamp(0.0, 1.0),
                    is_voiced: self.in_band(pitch_hz),
                }
            }
            None => PitchEstimate::unvoiced(),
        }
    }

    /// Run the estimator over the frame grid of a whole buffer.
    ///
    /// Frame count is floor((N - frame_size) / hop_size) + 1, or 0 when the
    /// buffer is shorter than one frame. Unvoiced frames record pitch 0.
    pub fn track_frames(
        &self,
        samples: &[f32],
        sample_rate: u32,
        frame_size: usize,
        hop_size: usize,
    ) -> PitchTrack {
        let count = framing::frame_count(samples.len(), frame_size, hop_size);
        let mut track = PitchTrack {
            pitches: Vec::with_capacity(count),
            confidences: Vec::with_capacity(count),
            voiced_frames: 0,
            total_frames: count,
        };

        for frame in framing::frames(samples, frame_size, hop_size) {
            let estimate = self.estimate(frame, sample_rate);
            if estimate.is_voiced {
                track.voiced_frames += 1;
                track.pitches.push(estimate.pitch_hz);
            } else {
                track.pitches.push(0.0);
            }
            track.confidences.push(estimate.confidence);
        }

        debug!(
            method = %self.config.method,
            frames = track.total_frames,
            voiced = track.voiced_frames,
            "pitch track complete"
        );

        track
    }

    /// Lag search range [floor(sr / ceiling), min(ceil(sr / floor), N - 1)].
    /// None when the frame is too short to hold a single candidate.
    fn lag_range(&self, frame_len: usize, sample_rate: u32) -> Option<(usize, usize)> {
        if frame_len < 3 || sample_rate == 0 {
            return None;
        }
        let sr = sample_rate as f32;
        let min_lag = ((sr / self.config.pitch_ceiling_hz).floor() as usize).max(1);
        let max_lag = ((sr / self.config.pitch_floor_hz).ceil() as usize).min(frame_len - 1);

        (min_lag < max_lag).then_some((min_lag, max_lag))
    }

    fn in_band(&self, hz: f32) -> bool {
        hz >= self.config.pitch_floor_hz && hz <= self.config.pitch_ceiling_hz
    }
}

/// d(τ) for τ in 0..=max_tau.
fn difference_function(frame: &[f32], max_tau: usize) -> Vec<f32> {
    (0..=max_tau)
        .map(|tau| {
            frame[..frame.len() - tau]
                .iter()
                .zip(&frame[tau..])
                .map(|(&a, &b)| (a - b) * (a - b))
                .sum()
        })
        .collect()
}

/// Cumulative-mean-normalized difference.
///
/// A running sum of 0 (silence up to τ) means there's no periodicity to
/// measure, so cmnd stays at 1 instead of dividing by zero.
fn cumulative_mean_normalized(diff: &[f32]) -> Vec<f32> {
    let mut cmnd = Vec::with_capacity(diff.len());
    let mut running = 0.0_f32;

    for (tau, &d) in diff.iter().enumerate() {
        if tau == 0 {
            cmnd.push(1.0);
            continue;
        }
        running += d;
        if running > 0.0 {
            cmnd.push(d * tau as f32 / running);
        } else {
            cmnd.push(1.0);
        }
    }

    cmnd
}

/// x-coordinate of the vertex of the parabola through (τ-1, a), (τ, b), (τ+1, c).
fn parabolic_vertex(a: f32, b: f32, c: f32, tau: f32) -> f32 {
    let denom = a - 2.0 * b + c;
    if denom.abs() < f32::EPSILON {
        return tau;
    }
    tau + (a - c) / (2.0 * denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Generate a sine wave at a known frequency.
    /// This is our ground truth for testing pitch detection.
    fn sine_wave(freq_hz: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn noise(len: usize) -> Vec<f32> {
        let mut state: u32 = 42;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1103515245).wrapping_add(12345);
                0.5 * ((state as f32 / u32::MAX as f32) * 2.0 - 1.0)
            })
            .collect()
    }

    fn tracker(method: PitchMethod) -> PitchTracker {
        PitchTracker::new(PitchConfig {
            method,
            ..PitchConfig::default()
        })
    }

    fn assert_within(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= expected * tolerance,
            "Expected {expected:.1} Hz ±{:.0}%, got {actual:.1} Hz",
            tolerance * 100.0
        );
    }

    #[test]
    fn yin_recovers_220hz() {
        let frame = sine_wave(220.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Yin).estimate(&frame, 16000);

        assert!(est.is_voiced);
        assert!(est.confidence > 0.5, "confidence {:.2}", est.confidence);
        assert_within(est.pitch_hz, 220.0, 0.10);
    }

    #[test]
    fn yin_refinement_is_tight() {
        // Parabolic refinement should land much closer than ±10%
        let frame = sine_wave(220.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Yin).estimate(&frame, 16000);
        assert_within(est.pitch_hz, 220.0, 0.02);
    }

    #[test]
    fn yin_recovers_across_band() {
        let yin = tracker(PitchMethod::Yin);
        for freq in [110.0, 165.0, 330.0, 440.0] {
            let frame = sine_wave(freq, 16000, 1024, 0.5);
            let est = yin.estimate(&frame, 16000);
            assert!(est.is_voiced, "{freq} Hz should be voiced");
            assert_within(est.pitch_hz, freq, 0.10);
        }
    }

    #[test]
    fn yin_silence_is_unvoiced() {
        let est = tracker(PitchMethod::Yin).estimate(&[0.0; 1024], 16000);
        assert_eq!(est, PitchEstimate::unvoiced());
    }

    #[test]
    fn yin_noise_is_unvoiced() {
        let est = tracker(PitchMethod::Yin).estimate(&noise(1024), 16000);
        assert!(!est.is_voiced, "White noise should not be voiced: {est:?}");
    }

    #[test]
    fn yin_tone_below_floor_is_unvoiced() {
        // 40 Hz has a 400-sample period; the search stops at 320 samples
        let frame = sine_wave(40.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Yin).estimate(&frame, 16000);
        assert!(!est.is_voiced);
        assert_eq!(est.pitch_hz, 0.0);
    }

    #[test]
    fn yin_tiny_frame_is_unvoiced() {
        let est = tracker(PitchMethod::Yin).estimate(&[0.1, -0.1], 16000);
        assert_eq!(est, PitchEstimate::unvoiced());
    }

    #[test]
    fn autocorrelation_recovers_220hz() {
        let frame = sine_wave(220.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Autocorrelation).estimate(&frame, 16000);

        assert!(est.is_voiced);
        assert!(est.confidence > 0.3);
        assert_within(est.pitch_hz, 220.0, 0.10);
    }

    #[test]
    fn autocorrelation_silence_is_unvoiced() {
        let est = tracker(PitchMethod::Autocorrelation).estimate(&[0.0; 1024], 16000);
        assert!(!est.is_voiced);
        assert_eq!(est.confidence, 0.0);
    }

    #[test]
    fn autocorrelation_tone_above_ceiling_is_unvoiced() {
        // The shortest searched lag is floor(16000 / 600) = 26, i.e. 615 Hz
        let frame = sine_wave(615.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Autocorrelation).estimate(&frame, 16000);

        assert_within(est.pitch_hz, 615.0, 0.02);
        assert!(est.confidence > 0.3, "Clean tone should correlate: {est:?}");
        assert!(!est.is_voiced, "615 Hz is above the 600 Hz ceiling: {est:?}");
    }

    #[test]
    fn autocorrelation_noise_is_unvoiced() {
        let est = tracker(PitchMethod::Autocorrelation).estimate(&noise(1024), 16000);
        assert!(est.confidence <= 0.3, "Noise should barely correlate: {est:?}");
        assert!(!est.is_voiced);
    }

    #[test]
    fn autocorrelation_respects_min_correlation() {
        // A 1024-sample frame loses ~7% correlation at the 73-sample lag
        let strict = PitchTracker::new(PitchConfig {
            method: PitchMethod::Autocorrelation,
            min_correlation: 0.99,
            ..PitchConfig::default()
        });
        let est = strict.estimate(&sine_wave(220.0, 16000, 1024, 0.5), 16000);

        assert_within(est.pitch_hz, 220.0, 0.10);
        assert!(!est.is_voiced, "{est:?}");
    }

    #[test]
    fn mcleod_recovers_220hz() {
        let frame = sine_wave(220.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Mcleod).estimate(&frame, 16000);

        assert!(est.is_voiced);
        assert_within(est.pitch_hz, 220.0, 0.10);
    }

    #[test]
    fn mcleod_tone_above_ceiling_is_unvoiced() {
        let frame = sine_wave(700.0, 16000, 1024, 0.5);
        let est = tracker(PitchMethod::Mcleod).estimate(&frame, 16000);

        assert_within(est.pitch_hz, 700.0, 0.05);
        assert!(!est.is_voiced, "700 Hz is above the 600 Hz ceiling: {est:?}");
    }

    #[test]
    fn mcleod_silence_is_unvoiced() {
        let est = tracker(PitchMethod::Mcleod).estimate(&[0.0; 1024], 16000);
        assert!(!est.is_voiced);
    }

    #[test]
    fn track_frames_counts_grid() {
        let samples = sine_wave(220.0, 16000, 1024 + 2 * 512, 0.5);
        let track = PitchTracker::default().track_frames(&samples, 16000, 1024, 512);

        assert_eq!(track.total_frames, 3);
        assert_eq!(track.pitches.len(), 3);
        assert_eq!(track.confidences.len(), 3);
        assert_eq!(track.voiced_frames, 3);
        for &p in &track.pitches {
            assert_within(p, 220.0, 0.10);
        }
    }

    #[test]
    fn track_frames_silence() {
        let track = PitchTracker::default().track_frames(&[0.0; 16000], 16000, 1024, 512);
        assert_eq!(track.total_frames, 30);
        assert_eq!(track.voiced_frames, 0);
        assert!(track.pitches.iter().all(|&p| p == 0.0));
        assert_eq!(track.voiced_ratio(), 0.0);
        assert!(track.voiced_pitches().is_empty());
    }

    #[test]
    fn track_frames_short_buffer_is_empty() {
        let track = PitchTracker::default().track_frames(&[0.1; 500], 16000, 1024, 512);
        assert_eq!(track.total_frames, 0);
        assert_eq!(track.voiced_ratio(), 0.0);
    }

    #[test]
    fn track_zeroes_unvoiced_frames() {
        // Tone then silence: the silent half must record 0 Hz
        let mut samples = sine_wave(220.0, 16000, 4096, 0.5);
        samples.extend(std::iter::repeat(0.0).take(4096));
        let track = PitchTracker::default().track_frames(&samples, 16000, 1024, 512);

        assert!(track.voiced_frames > 0);
        assert!(track.voiced_frames < track.total_frames);
        assert_eq!(*track.pitches.last().unwrap(), 0.0);
        assert_eq!(track.voiced_pitches().len(), track.voiced_frames);
    }

    #[test]
    fn method_parses_from_str() {
        assert_eq!("yin".parse::<PitchMethod>().unwrap(), PitchMethod::Yin);
        assert_eq!("ACF".parse::<PitchMethod>().unwrap(), PitchMethod::Autocorrelation);
        assert_eq!("mcleod".parse::<PitchMethod>().unwrap(), PitchMethod::Mcleod);
        assert!("crepe".parse::<PitchMethod>().is_err());
    }

    #[test]
    fn method_display_roundtrips() {
        for method in [PitchMethod::Yin, PitchMethod::Autocorrelation, PitchMethod::Mcleod] {
            assert_eq!(method.to_string().parse::<PitchMethod>().unwrap(), method);
        }
    }

    #[test]
    fn cmnd_starts_at_one() {
        let frame = sine_wave(220.0, 16000, 256, 0.5);
        let cmnd = cumulative_mean_normalized(&difference_function(&frame, 100));
        assert_eq!(cmnd[0], 1.0);
        assert_eq!(cmnd.len(), 101);
    }

    #[test]
    fn parabolic_vertex_symmetric_is_centre() {
        assert_eq!(parabolic_vertex(1.0, 0.0, 1.0, 10.0), 10.0);
        // Lower left neighbour pulls the vertex left
        assert!(parabolic_vertex(0.5, 0.0, 1.0, 10.0) < 10.0);
    }
}
