// src/engine/decoder.rs
//
// Decode boundary: encoded bytes -> PixelBuffer (RGB8, alpha dropped).

use super::buffer::PixelBuffer;
use super::common::run_with_panic_policy;
use crate::engine::{MAX_DIMENSION, MAX_PIXELS};
use crate::error::{ProcessError, Result};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Formats accepted at the decode boundary.
pub const SUPPORTED_INPUT_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// Detect input format using magic bytes. Returns None if unknown.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

pub fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_lowercase()
}

/// Decode entrypoint:
/// - Detect format once (magic bytes) and check it against the allow-list
/// - Reject oversized images from the header, before allocating pixels
/// - Decode under the panic policy and normalize to RGB8
pub fn decode_image(bytes: &[u8]) -> Result<(PixelBuffer, ImageFormat)> {
    let format = detect_format(bytes)
        .ok_or_else(|| ProcessError::decode_failed("unrecognized image data"))?;
    if !SUPPORTED_INPUT_FORMATS.contains(&format) {
        return Err(ProcessError::unsupported_format(format_name(format)));
    }
    ensure_dimensions_safe(bytes, format)?;

    let buffer = run_with_panic_policy("decode", || {
        let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            ProcessError::decode_failed(format!("{} decode failed: {e}", format_name(format)))
        })?;
        PixelBuffer::try_from(img.into_rgb8())
    })?;
    Ok((buffer, format))
}

/// Check if image dimensions are within safe limits.
/// Returns an error if the image is too large (potential decompression bomb).
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ProcessError::dimension_exceeds_limit(
            width.max(height),
            MAX_DIMENSION,
        ));
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXELS {
        return Err(ProcessError::pixel_count_exceeds_limit(pixels, MAX_PIXELS));
    }
    Ok(())
}

/// Read only the header and ensure the dimensions are safe before decoding.
pub fn ensure_dimensions_safe(bytes: &[u8], format: ImageFormat) -> Result<()> {
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| ProcessError::decode_failed(format!("failed to read dimensions: {e}")))?;
    check_dimensions(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[test]
    fn decodes_png_and_drops_alpha() {
        let rgba = RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 50, y as u8 * 70, 9, 17]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);
        let (buffer, format) = decode_image(&bytes).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(buffer.dimensions(), (3, 2));
        assert_eq!(buffer.pixel(2, 1), [100, 70, 9]);
    }

    #[test]
    fn decodes_bmp() {
        let rgb = image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb), ImageFormat::Bmp);
        let (buffer, format) = decode_image(&bytes).unwrap();
        assert_eq!(format, ImageFormat::Bmp);
        assert_eq!(buffer.pixel(3, 3), [1, 2, 3]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ProcessError::DecodeFailed { .. }));
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn gif_is_unsupported() {
        let err = decode_image(b"GIF89a\x01\x00\x01\x00\x00\x00\x00").unwrap_err();
        assert_eq!(err, ProcessError::unsupported_format("gif"));
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let rgb = image::RgbImage::from_pixel(16, 16, image::Rgb([200, 10, 10]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb), ImageFormat::Png);
        let err = decode_image(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, ProcessError::DecodeFailed { .. }));
    }

    #[test]
    fn check_dimensions_limits() {
        assert!(check_dimensions(1024, 1024).is_ok());
        assert_eq!(
            check_dimensions(MAX_DIMENSION + 1, 10).unwrap_err(),
            ProcessError::dimension_exceeds_limit(MAX_DIMENSION + 1, MAX_DIMENSION)
        );
        assert!(matches!(
            check_dimensions(20_000, 20_000).unwrap_err(),
            ProcessError::PixelCountExceedsLimit { .. }
        ));
    }
}
