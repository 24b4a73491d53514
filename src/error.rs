use std::fmt;

/// Errors raised by the analysis pipeline.
///
/// The DSP helpers themselves are total: silence, empty frames and zero
/// denominators all collapse to 0. These variants cover the preconditions
/// a caller has to meet before any statistics can be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The buffer holds fewer samples than a single analysis frame.
    BufferTooShort { samples: usize, frame_size: usize },
    /// The buffer is not mono.
    NotMono { channels: u16 },
    /// Sample rate of zero.
    InvalidSampleRate,
    /// Frame or hop size that cannot produce a frame grid.
    InvalidFraming { frame_size: usize, hop_size: usize },
    /// FFT length that is not a power of two.
    FftSize { len: usize },
    /// Pitch band where the floor is not below the ceiling.
    InvalidPitchBand { floor_hz: f32, ceiling_hz: f32 },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::BufferTooShort {
                samples,
                frame_size,
            } => write!(
                f,
                "buffer too short to extract any frame: {samples} samples, need at least {frame_size}"
            ),
            AnalysisError::NotMono { channels } => {
                write!(f, "expected a mono buffer, got {channels} channels")
            }
            AnalysisError::InvalidSampleRate => write!(f, "sample rate must be greater than 0"),
            AnalysisError::InvalidFraming {
                frame_size,
                hop_size,
            } => write!(
                f,
                "invalid framing: frame size {frame_size}, hop size {hop_size}"
            ),
            AnalysisError::FftSize { len } => {
                write!(f, "FFT length must be a power of two, got {len}")
            }
            AnalysisError::InvalidPitchBand {
                floor_hz,
                ceiling_hz,
            } => write!(
                f,
                "pitch floor ({floor_hz} Hz) must be below pitch ceiling ({ceiling_hz} Hz)"
            ),
        }
    }
}

impl std::error::Error for AnalysisError {}
