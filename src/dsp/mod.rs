//! Frame-level signal processing: framing, windowing, FFT, and the
//! per-frame pitch, spectral and time-domain analyzers.

pub mod fft;
pub mod framing;
pub mod perturbation;
pub mod pitch;
pub mod spectral;
pub mod stats;
pub mod temporal;
pub mod windowing;
