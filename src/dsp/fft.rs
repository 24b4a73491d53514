use std::f32::consts::PI;

use crate::error::AnalysisError;

/// In-place iterative radix-2 Cooley–Tukey FFT.
///
/// `re` and `im` hold the real and imaginary parts and are overwritten with
/// the forward transform. Both slices must have the same power-of-two length.
///
/// Algorithm:
/// 1. Bit-reversal permutation of the input
/// 2. log2(n) butterfly stages, doubling the sub-transform length each time,
///    with twiddle factors e^{-2πi·k/len}
pub fn fft_in_place(re: &mut [f32], im: &mut [f32]) -> Result<(), AnalysisError> {
    let n = re.len();
    if n != im.len() || !n.is_power_of_two() {
        return Err(AnalysisError::FftSize { len: n });
    }
    if n == 1 {
        return Ok(());
    }

    bit_reverse_permute(re, im);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let angle = -2.0 * PI / len as f32;

        for start in (0..n).step_by(len) {
            for k in 0..half {
                let (t_im, t_re) = (angle * k as f32).sin_cos();
                let a = start + k;
                let b = a + half;

                let u_re = re[a];
                let u_im = im[a];
                let v_re = re[b] * t_re - im[b] * t_im;
                let v_im = re[b] * t_im + im[b] * t_re;

                re[a] = u_re + v_re;
                im[a] = u_im + v_im;
                re[b] = u_re - v_re;
                im[b] = u_im - v_im;
            }
        }

        len <<= 1;
    }

    Ok(())
}

fn bit_reverse_permute(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;

        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

/// Magnitudes of the first half of the bins (0 .. n/2).
pub fn half_magnitudes(re: &[f32], im: &[f32]) -> Vec<f32> {
    let half = re.len() / 2;
    re[..half]
        .iter()
        .zip(&im[..half])
        .map(|(&r, &i)| (r * r + i * i).sqrt())
        .collect()
}
