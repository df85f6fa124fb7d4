// src/engine.rs
//
// The core of sampling-lab. Pure transforms over an RGB8 pixel buffer:
// 1. Decimation (with or without a box pre-filter) and integer magnification
// 2. Aliasing demonstration, unsharp masking, contrast/brightness
// 3. A dispatcher that turns (operation, raw params) into one of the above
//
// Codec and limit handling live at the edges (decoder/encoder/limits/api);
// this file is a facade over the modules in engine/.

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum allowed image dimension (width or height).
/// Images larger than 32768x32768 are rejected at decode time.
pub const MAX_DIMENSION: u32 = 32768;

/// Maximum allowed total pixels (width * height).
/// 100 megapixels = 300MB of RGB8.
pub const MAX_PIXELS: u64 = 100_000_000;

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod aliasing;
mod api;
mod buffer;
mod common;
mod contrast;
mod decoder;
mod dispatch;
mod encoder;
mod limits;
pub mod params;
mod resample;
mod sharpen;

pub use aliasing::demonstrate_aliasing;
pub use api::{BatchRequest, ImageProcessor, ProcessedOutput};
pub use buffer::{PixelBuffer, CHANNELS};
pub use contrast::adjust_contrast;
pub use decoder::{
    check_dimensions, decode_image, detect_format, ensure_dimensions_safe, format_name,
    SUPPORTED_INPUT_FORMATS,
};
pub use dispatch::{apply, process, Processed};
pub use encoder::{encode_png, EncodeOptions, MAX_OPTIMIZE_LEVEL};
pub use limits::{LimitsPolicy, ProcessingLimits, LIMITS_ENV};
pub use params::RawParams;
pub use resample::{downsample, resize, upsample};
pub use sharpen::{gaussian_blur, unsharp_mask};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Interpolation;

    #[test]
    fn facade_exposes_full_pipeline() {
        let src = PixelBuffer::from_fn(12, 12, |x, y| [(x * 20) as u8, (y * 20) as u8, 0]).unwrap();
        let down = downsample(&src, 3, true);
        let up = upsample(&down, 3, Interpolation::Bilinear);
        assert_eq!(up.dimensions(), src.dimensions());
        let png = encode_png(&up, &EncodeOptions::fast()).unwrap();
        let (decoded, _) = decode_image(&png).unwrap();
        assert_eq!(decoded, up);
    }

    #[test]
    fn global_caps_are_consistent() {
        assert!(u64::from(MAX_DIMENSION) * u64::from(MAX_DIMENSION) > MAX_PIXELS);
        assert!(check_dimensions(MAX_DIMENSION, 1).is_ok());
    }
}
