use super::{fft, windowing};
use crate::error::AnalysisError;

/// Per-frame spectral measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFrame {
    /// Magnitude-weighted mean frequency in Hz (0 for a silent frame).
    pub centroid_hz: f32,
}

/// Computes the spectral centroid of individual frames.
///
/// Each frame is Hann-windowed, zero-padded to the next power of two and
/// transformed with the radix-2 FFT in `dsp::fft`. Only the first half of
/// the bins is used since the input is real.
pub struct SpectralAnalyzer {
    sample_rate: u32,
}

impl SpectralAnalyzer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn analyze(&self, frame: &[f32]) -> Result<SpectralFrame, AnalysisError> {
        let magnitudes = self.magnitude_spectrum(frame)?;
        Ok(SpectralFrame {
            centroid_hz: self.centroid(&magnitudes, fft_size(frame.len())),
        })
    }

    /// Magnitude spectrum over the first `fft_size / 2` bins.
    pub fn magnitude_spectrum(&self, frame: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        let size = fft_size(frame.len());

        let mut re = vec![0.0_f32; size];
        re[..frame.len()].copy_from_slice(frame);
        windowing::hann_in_place(&mut re[..frame.len()]);
        let mut im = vec![0.0_f32; size];

        fft::fft_in_place(&mut re, &mut im)?;
        Ok(fft::half_magnitudes(&re, &im))
    }

    /// centroid = Σ(f_k × |X[k]|) / Σ|X[k]|, with f_k = k × sample_rate / fft_size
    fn centroid(&self, magnitudes: &[f32], fft_size: usize) -> f32 {
        let bin_width = self.sample_rate as f32 / fft_size as f32;

        let (weighted, total) = magnitudes
            .iter()
            .enumerate()
            .fold((0.0_f32, 0.0_f32), |(w, t), (k, &m)| {
                (w + k as f32 * bin_width * m, t + m)
            });

        if total == 0.0 {
            0.0
        } else {
            weighted / total
        }
    }
}

/// Smallest power of two ≥ `len` (1 for an empty frame).
fn fft_size(len: usize) -> usize {
    len.max(1).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_wave(freq_hz: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn centroid_of_tone_near_its_frequency() {
        let analyzer = SpectralAnalyzer::new(16000);
        let frame = sine_wave(1000.0, 16000, 1024);
        let centroid = analyzer.analyze(&frame).unwrap().centroid_hz;
        assert!(
            (centroid - 1000.0).abs() < 50.0,
            "Centroid should sit near 1000 Hz, got {centroid:.1}"
        );
    }

    #[test]
    fn brighter_tone_has_higher_centroid() {
        let analyzer = SpectralAnalyzer::new(16000);
        let low = analyzer.analyze(&sine_wave(300.0, 16000, 1024)).unwrap().centroid_hz;
        let high = analyzer.analyze(&sine_wave(3000.0, 16000, 1024)).unwrap().centroid_hz;
        assert!(high > low, "3 kHz ({high:.0}) should be brighter than 300 Hz ({low:.0})");
    }

    #[test]
    fn silence_has_zero_centroid() {
        let analyzer = SpectralAnalyzer::new(16000);
        assert_eq!(analyzer.analyze(&[0.0; 1024]).unwrap().centroid_hz, 0.0);
    }

    #[test]
    fn odd_length_frame_is_zero_padded() {
        let analyzer = SpectralAnalyzer::new(16000);
        let frame = sine_wave(1000.0, 16000, 1000);
        // 1000 samples pad to 1024 → 512 magnitude bins
        assert_eq!(analyzer.magnitude_spectrum(&frame).unwrap().len(), 512);
        let centroid = analyzer.analyze(&frame).unwrap().centroid_hz;
        assert!((centroid - 1000.0).abs() < 60.0, "got {centroid:.1}");
    }

    #[test]
    fn empty_frame_is_zero() {
        let analyzer = SpectralAnalyzer::new(16000);
        assert_eq!(analyzer.analyze(&[]).unwrap().centroid_hz, 0.0);
    }

    #[test]
    fn every_frame_length_pads_to_a_valid_fft() {
        let analyzer = SpectralAnalyzer::new(16000);
        for len in [1, 2, 3, 500, 513, 1023, 1024, 1025] {
            let frame = sine_wave(440.0, 16000, len);
            let spectrum = analyzer.magnitude_spectrum(&frame).unwrap();
            assert_eq!(spectrum.len(), len.next_power_of_two() / 2, "len {len}");
        }
    }
}
