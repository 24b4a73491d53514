/// Default analysis frame length in samples.
pub const DEFAULT_FRAME_SIZE: usize = 1024;

/// Default hop between frame starts in samples (50% overlap).
pub const DEFAULT_HOP_SIZE: usize = 512;

/// Number of full frames that fit in `len` samples.
///
/// floor((len - frame_size) / hop_size) + 1, or 0 when the buffer is shorter
/// than one frame. Frames never run past the end of the buffer; a trailing
/// partial frame is dropped.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        return 0;
    }
    (len - frame_size) / hop_size + 1
}

/// Iterate over the frame grid as borrowed slices.
pub fn frames(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> impl Iterator<Item = &[f32]> + '_ {
    (0..frame_count(samples.len(), frame_size, hop_size)).map(move |i| {
        let start = i * hop_size;
        &samples[start..start + frame_size]
    })
}
