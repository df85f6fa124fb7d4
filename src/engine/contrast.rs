// src/engine/contrast.rs
//
// Contrast/brightness: out = clamp(round(v * alpha) + beta, 0, 255).

use super::buffer::PixelBuffer;
use rayon::prelude::*;

/// Apply the affine intensity map to every channel of every pixel.
///
/// `alpha = 1, beta = 0` is an exact identity.
pub fn adjust_contrast(src: &PixelBuffer, alpha: f64, beta: i32) -> PixelBuffer {
    let lut = contrast_lut(alpha, beta);
    let out = src.as_raw().par_iter().map(|&v| lut[v as usize]).collect();
    PixelBuffer::from_parts(src.width(), src.height(), out)
}

fn contrast_lut(alpha: f64, beta: i32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        let scaled = (v as f64 * alpha).round() as i64;
        *slot = (scaled + i64::from(beta)).clamp(0, 255) as u8;
    }
    lut
}
