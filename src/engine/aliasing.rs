// src/engine/aliasing.rs
//
// Aliasing demonstration: sample without a low-pass filter, then bring the
// result back to the original size so the folded frequencies are visible.

use super::buffer::PixelBuffer;
use super::resample::{downsample, resize};
use crate::ops::Interpolation;

/// Decimate by `factor` without antialiasing, then resize back to the
/// source dimensions with `method`.
///
/// Never fails: sources smaller than `factor` decimate to a single pixel.
pub fn demonstrate_aliasing(src: &PixelBuffer, factor: u32, method: Interpolation) -> PixelBuffer {
    let reduced = downsample(src, factor, false);
    resize(&reduced, src.width(), src.height(), method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_matches_source_dimensions() {
        let src = PixelBuffer::from_fn(37, 23, |x, y| [x as u8, y as u8, 0]).unwrap();
        for method in [
            Interpolation::Nearest,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
        ] {
            let out = demonstrate_aliasing(&src, 8, method);
            assert_eq!(out.dimensions(), (37, 23));
        }
    }

    #[test]
    fn tiny_source_collapses_to_first_pixel() {
        let src = PixelBuffer::from_fn(10, 6, |x, y| [x as u8 * 20, y as u8 * 40, 9]).unwrap();
        let out = demonstrate_aliasing(&src, 16, Interpolation::Nearest);
        assert_eq!(out.dimensions(), (10, 6));
        assert!(out.as_raw().chunks_exact(3).all(|px| px == [0, 0, 9]));
    }

    #[test]
    fn stripes_at_sampling_rate_alias_to_flat_field() {
        // Vertical stripes with period 2 sampled every 2nd pixel: every sample
        // lands on a white column and the pattern disappears entirely.
        let src = PixelBuffer::from_fn(16, 8, |x, _| if x % 2 == 0 { [255; 3] } else { [0; 3] })
            .unwrap();
        let out = demonstrate_aliasing(&src, 2, Interpolation::Bilinear);
        assert!(out.as_raw().iter().all(|&v| v == 255));
    }
}
