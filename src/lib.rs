//! On-device acoustic voice check.
//!
//! A complete mono recording goes in; three bounded state signals
//! (energy, tension, clarity), an insight message, a display category and a
//! confidence label come out. The pipeline is pure computation: no I/O, no
//! shared state, and nothing survives the call.
//!
//! ```no_run
//! use voicepulse::{analyze, AnalysisConfig, AudioBuffer};
//!
//! let samples = vec![0.0_f32; 16000 * 30];
//! let result = analyze(AudioBuffer::new(samples, 16000), &AnalysisConfig::default())?;
//! println!("{} ({})", result.insight, result.confidence);
//! # Ok::<(), voicepulse::AnalysisError>(())
//! ```

pub mod analysis;
pub mod audio;
pub mod config;
pub mod dsp;
pub mod error;
pub mod paths;
pub mod util;

pub use analysis::features::{AcousticFeatures, FeatureExtractor};
pub use analysis::insight::Category;
pub use analysis::scoring::{Confidence, VoiceScores};
pub use analysis::{analyze, evaluate, AnalysisResult};
pub use audio::AudioBuffer;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
