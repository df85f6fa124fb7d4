// src/engine/encoder.rs
//
// Encode boundary: PixelBuffer -> PNG, optionally recompressed with oxipng.

use super::buffer::PixelBuffer;
use super::common::run_with_panic_policy;
use crate::error::{ProcessError, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Highest oxipng preset; larger values are clamped.
pub const MAX_OPTIMIZE_LEVEL: u8 = 6;

/// PNG output settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Run oxipng over the encoded PNG (lossless).
    pub optimize: bool,
    /// oxipng preset, 0 (fast) to 6 (smallest).
    pub optimize_level: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            optimize_level: 2,
        }
    }
}

impl EncodeOptions {
    /// Plain `image` crate output, no recompression.
    pub fn fast() -> Self {
        Self {
            optimize: false,
            ..Self::default()
        }
    }

    pub fn with_level(level: u8) -> Self {
        Self {
            optimize: true,
            optimize_level: level.min(MAX_OPTIMIZE_LEVEL),
        }
    }
}

/// Encode to PNG using the image crate, then optionally oxipng.
pub fn encode_png(buffer: &PixelBuffer, options: &EncodeOptions) -> Result<Vec<u8>> {
    run_with_panic_policy("encode:png", || {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(
                buffer.as_raw(),
                buffer.width(),
                buffer.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ProcessError::encode_failed("png", format!("PNG encode failed: {e}")))?;

        if !options.optimize {
            return Ok(buf);
        }

        let mut oxi = oxipng::Options::from_preset(options.optimize_level.min(MAX_OPTIMIZE_LEVEL));
        oxi.strip = oxipng::StripChunks::Safe;
        oxipng::optimize_from_memory(&buf, &oxi).map_err(|e| {
            ProcessError::encode_failed("png", format!("oxipng optimization failed: {e}"))
        })
    })
}
