// src/engine/sharpen.rs
//
// Unsharp mask: out = v * (1 + amount) - blur * amount, with a separable
// Gaussian blur (sigma = radius, half-width ceil(3 * sigma), reflect-101 border).

use super::buffer::{PixelBuffer, CHANNELS};
use super::common::saturate_u8;
use rayon::prelude::*;

/// Sharpen by subtracting a Gaussian-blurred copy.
///
/// `amount == 0` returns an exact copy of `src`.
pub fn unsharp_mask(src: &PixelBuffer, amount: f64, radius: u32) -> PixelBuffer {
    if amount <= 0.0 {
        return src.clone();
    }
    let blur = blur_samples(src, radius.max(1) as f32);
    let amount = amount as f32;
    let gain = 1.0 + amount;

    let mut out = vec![0u8; src.as_raw().len()];
    out.par_chunks_mut(src.stride())
        .zip(src.as_raw().par_chunks(src.stride()))
        .zip(blur.par_chunks(src.stride()))
        .for_each(|((dst_row, src_row), blur_row)| {
            for ((dst, &v), &b) in dst_row.iter_mut().zip(src_row).zip(blur_row) {
                *dst = saturate_u8(f32::from(v) * gain - b * amount);
            }
        });

    PixelBuffer::from_parts(src.width(), src.height(), out)
}

/// Gaussian blur with the given sigma, rounded back to u8.
pub fn gaussian_blur(src: &PixelBuffer, sigma: f32) -> PixelBuffer {
    let blur = blur_samples(src, sigma);
    let out = blur.par_iter().map(|&v| saturate_u8(v)).collect();
    PixelBuffer::from_parts(src.width(), src.height(), out)
}

/// Normalized 1D Gaussian kernel of length `2 * ceil(3 * sigma) + 1`.
pub(crate) fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let sigma = f64::from(sigma.max(f32::EPSILON));
    let half = (3.0 * sigma).ceil() as i64;
    let weights: Vec<f64> = (-half..=half)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / total) as f32).collect()
}

/// Mirror `i` into `[0, len)` without repeating the edge sample.
#[inline]
fn reflect_101(i: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let i = i.rem_euclid(period);
    (if i >= len { period - i } else { i }) as usize
}

/// Source indices for every (position, tap) pair along one axis.
fn tap_indices(len: u32, kernel_len: usize) -> Vec<usize> {
    let half = (kernel_len / 2) as i64;
    let len = i64::from(len);
    (0..len)
        .flat_map(|p| (-half..=half).map(move |k| reflect_101(p + k, len)))
        .collect()
}

/// Separable blur kept in f32 so the unsharp mask subtracts an unrounded
/// low-pass image.
fn blur_samples(src: &PixelBuffer, sigma: f32) -> Vec<f32> {
    let kernel = gaussian_kernel(sigma);
    let klen = kernel.len();
    let (width, height) = src.dimensions();
    let stride = src.stride();

    let idx_x = tap_indices(width, klen);
    let mut horizontal = vec![0f32; src.as_raw().len()];
    horizontal
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, tmp_row)| {
            let src_row = src.row(y as u32);
            for x in 0..width as usize {
                let taps = &idx_x[x * klen..(x + 1) * klen];
                for c in 0..CHANNELS {
                    let mut acc = 0f32;
                    for (&w, &sx) in kernel.iter().zip(taps) {
                        acc += w * f32::from(src_row[sx * CHANNELS + c]);
                    }
                    tmp_row[x * CHANNELS + c] = acc;
                }
            }
        });

    let idx_y = tap_indices(height, klen);
    let mut out = vec![0f32; horizontal.len()];
    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let taps = &idx_y[y * klen..(y + 1) * klen];
            for (i, dst) in dst_row.iter_mut().enumerate() {
                let mut acc = 0f32;
                for (&w, &sy) in kernel.iter().zip(taps) {
                    acc += w * horizontal[sy * stride + i];
                }
                *dst = acc;
            }
        });
    out
}
