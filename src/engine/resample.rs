// src/engine/resample.rs
//
// Resampler: integer-factor decimation and interpolation-based resizing.
//
// Kernels are implemented here rather than delegated to a resize library so
// that decimation (corner pixel of each block) and the antialiased block
// mean are exact and reproducible.

use super::buffer::{PixelBuffer, CHANNELS};
use super::common::saturate_u8;
use crate::ops::Interpolation;
use rayon::prelude::*;

/// Cubic convolution coefficient (same as OpenCV's INTER_CUBIC).
const CUBIC_A: f64 = -0.75;

/// Decimate by `factor`.
///
/// Output is `max(1, w / factor)` x `max(1, h / factor)`. With `antialias`
/// each output pixel is the rounded mean of its `factor x factor` source
/// block (clipped to the image); without it the block's top-left pixel is
/// taken as-is.
pub fn downsample(src: &PixelBuffer, factor: u32, antialias: bool) -> PixelBuffer {
    let factor = factor.max(1) as usize;
    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let dst_w = (src_w / factor).max(1);
    let dst_h = (src_h / factor).max(1);

    let mut out = vec![0u8; dst_w * dst_h * CHANNELS];
    out.par_chunks_mut(dst_w * CHANNELS)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let sy0 = y * factor;
            if antialias {
                let sy1 = (sy0 + factor).min(src_h);
                for x in 0..dst_w {
                    let sx0 = x * factor;
                    let sx1 = (sx0 + factor).min(src_w);
                    let mut sum = [0u32; CHANNELS];
                    for sy in sy0..sy1 {
                        let src_row = src.row(sy as u32);
                        for px in src_row[sx0 * CHANNELS..sx1 * CHANNELS].chunks_exact(CHANNELS) {
                            for c in 0..CHANNELS {
                                sum[c] += u32::from(px[c]);
                            }
                        }
                    }
                    let n = ((sy1 - sy0) * (sx1 - sx0)) as u32;
                    for c in 0..CHANNELS {
                        dst_row[x * CHANNELS + c] = ((sum[c] + n / 2) / n) as u8;
                    }
                }
            } else {
                let src_row = src.row(sy0 as u32);
                for x in 0..dst_w {
                    let s = x * factor * CHANNELS;
                    dst_row[x * CHANNELS..(x + 1) * CHANNELS]
                        .copy_from_slice(&src_row[s..s + CHANNELS]);
                }
            }
        });

    PixelBuffer::from_parts(dst_w as u32, dst_h as u32, out)
}

/// Magnify by an integer `scale`: output is `w * scale` x `h * scale`.
pub fn upsample(src: &PixelBuffer, scale: u32, method: Interpolation) -> PixelBuffer {
    let scale = scale.max(1);
    resize(
        src,
        src.width().saturating_mul(scale),
        src.height().saturating_mul(scale),
        method,
    )
}

/// Resize to an arbitrary `dst_width` x `dst_height` with the given kernel.
///
/// Nearest samples `floor(dst * src_len / dst_len)`. Bilinear and bicubic
/// use pixel-centre alignment with replicated edges.
pub fn resize(
    src: &PixelBuffer,
    dst_width: u32,
    dst_height: u32,
    method: Interpolation,
) -> PixelBuffer {
    let dst_width = dst_width.max(1);
    let dst_height = dst_height.max(1);
    match method {
        Interpolation::Nearest => resize_nearest(src, dst_width, dst_height),
        Interpolation::Bilinear | Interpolation::Bicubic => {
            resize_separable(src, dst_width, dst_height, method)
        }
    }
}

fn resize_nearest(src: &PixelBuffer, dst_w: u32, dst_h: u32) -> PixelBuffer {
    let map_x: Vec<usize> = (0..dst_w)
        .map(|x| nearest_index(x, src.width(), dst_w) * CHANNELS)
        .collect();
    let dst_stride = dst_w as usize * CHANNELS;

    let mut out = vec![0u8; dst_stride * dst_h as usize];
    out.par_chunks_mut(dst_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let sy = nearest_index(y as u32, src.height(), dst_h);
            let src_row = src.row(sy as u32);
            for (dst_px, &s) in dst_row.chunks_exact_mut(CHANNELS).zip(&map_x) {
                dst_px.copy_from_slice(&src_row[s..s + CHANNELS]);
            }
        });

    PixelBuffer::from_parts(dst_w, dst_h, out)
}

#[inline]
fn nearest_index(dst: u32, src_len: u32, dst_len: u32) -> usize {
    let s = u64::from(dst) * u64::from(src_len) / u64::from(dst_len);
    (s as usize).min(src_len as usize - 1)
}

/// Up to four source samples contributing to one destination sample.
#[derive(Clone, Copy, Debug)]
struct Taps {
    index: [usize; 4],
    weight: [f32; 4],
    len: usize,
}

fn axis_taps(src_len: u32, dst_len: u32, method: Interpolation) -> Vec<Taps> {
    let ratio = f64::from(src_len) / f64::from(dst_len);
    let last = i64::from(src_len) - 1;
    let clamp = |i: i64| i.clamp(0, last) as usize;

    (0..dst_len)
        .map(|d| {
            let s = (f64::from(d) + 0.5) * ratio - 0.5;
            let i0 = s.floor();
            let t = s - i0;
            let i0 = i0 as i64;
            match method {
                Interpolation::Bicubic => Taps {
                    index: [clamp(i0 - 1), clamp(i0), clamp(i0 + 1), clamp(i0 + 2)],
                    weight: [
                        cubic(t + 1.0) as f32,
                        cubic(t) as f32,
                        cubic(1.0 - t) as f32,
                        cubic(2.0 - t) as f32,
                    ],
                    len: 4,
                },
                _ => Taps {
                    index: [clamp(i0), clamp(i0 + 1), 0, 0],
                    weight: [(1.0 - t) as f32, t as f32, 0.0, 0.0],
                    len: 2,
                },
            }
        })
        .collect()
}

/// Cubic convolution kernel (Keys), support [-2, 2].
fn cubic(x: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        ((CUBIC_A + 2.0) * x - (CUBIC_A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((CUBIC_A * x - 5.0 * CUBIC_A) * x + 8.0 * CUBIC_A) * x - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn resize_separable(
    src: &PixelBuffer,
    dst_w: u32,
    dst_h: u32,
    method: Interpolation,
) -> PixelBuffer {
    let taps_x = axis_taps(src.width(), dst_w, method);
    let taps_y = axis_taps(src.height(), dst_h, method);
    let dst_stride = dst_w as usize * CHANNELS;

    // Horizontal pass: every source row -> dst_w samples, kept in f32.
    let mut horizontal = vec![0f32; dst_stride * src.height() as usize];
    horizontal
        .par_chunks_mut(dst_stride)
        .enumerate()
        .for_each(|(y, tmp_row)| {
            let src_row = src.row(y as u32);
            for (x, taps) in taps_x.iter().enumerate() {
                for c in 0..CHANNELS {
                    let mut acc = 0f32;
                    for k in 0..taps.len {
                        acc += taps.weight[k] * f32::from(src_row[taps.index[k] * CHANNELS + c]);
                    }
                    tmp_row[x * CHANNELS + c] = acc;
                }
            }
        });

    // Vertical pass: combine intermediate rows, round once at the end.
    let mut out = vec![0u8; dst_stride * dst_h as usize];
    out.par_chunks_mut(dst_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let taps = &taps_y[y];
            for (i, dst) in dst_row.iter_mut().enumerate() {
                let mut acc = 0f32;
                for k in 0..taps.len {
                    acc += taps.weight[k] * horizontal[taps.index[k] * dst_stride + i];
                }
                *dst = saturate_u8(acc);
            }
        });

    PixelBuffer::from_parts(dst_w, dst_h, out)
}
