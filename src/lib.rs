// lib.rs
//
// sampling-lab: sampling-theory demonstrations over RGB8 images.
//
// Design goals:
// - Exact, reproducible kernels (decimation, block mean, interpolation)
// - Lenient parameters: bad input falls back to defaults, never fails
// - Pure transforms; codecs and limits only at the edges
// - Row-parallel processing that is bit-identical to sequential

pub mod engine;
pub mod error;
pub mod ops;

use image::ImageReader;
use serde::Serialize;
use std::io::Cursor;

pub use engine::{
    process, BatchRequest, EncodeOptions, ImageProcessor, PixelBuffer, Processed,
    ProcessedOutput, ProcessingLimits, RawParams,
};
pub use error::{ErrorCategory, ProcessError, Result};
pub use ops::{Interpolation, Operation, OperationKind, ParamValue, ResultMetadata};

/// Header-level facts about an encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Detected format (png, jpeg, webp, gif, ...), None if unrecognized
    pub format: Option<String>,
}

/// Inspect image dimensions WITHOUT decoding pixels.
pub fn inspect(bytes: &[u8]) -> Result<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProcessError::decode_failed(format!("failed to read image header: {e}")))?;

    let format = reader.format().map(engine::format_name);
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ProcessError::decode_failed(format!("failed to read dimensions: {e}")))?;

    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

/// Get library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Names accepted by `process` / `ImageProcessor::process_bytes`.
pub fn supported_operations() -> Vec<&'static str> {
    OperationKind::ALL.iter().map(|kind| kind.as_str()).collect()
}

/// Metrics payload version.
pub const PROCESSING_METRICS_VERSION: &str = "1.0.0";

/// Per-request timings and sizes recorded by `ImageProcessor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingMetrics {
    /// Schema version for compatibility negotiation
    pub version: String,
    /// Decode stage duration in milliseconds
    pub decode_ms: f64,
    /// Ops (transform) stage duration in milliseconds
    pub ops_ms: f64,
    /// Encode stage duration in milliseconds
    pub encode_ms: f64,
    /// Total wall-clock duration in milliseconds
    pub total_ms: f64,
    /// Input size in bytes
    pub bytes_in: u64,
    /// Output (PNG) size in bytes
    pub bytes_out: u64,
    /// bytes_out / bytes_in
    pub compression_ratio: f64,
    /// Detected input format (lowercase: jpeg, png, webp, bmp)
    pub format_in: Option<String>,
}

impl Default for ProcessingMetrics {
    fn default() -> Self {
        Self {
            version: PROCESSING_METRICS_VERSION.to_string(),
            decode_ms: 0.0,
            ops_ms: 0.0,
            encode_ms: 0.0,
            total_ms: 0.0,
            bytes_in: 0,
            bytes_out: 0,
            compression_ratio: 0.0,
            format_in: None,
        }
    }
}

impl ProcessingMetrics {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_reads_header_only() {
        let src = PixelBuffer::filled(7, 3, [1, 2, 3]).unwrap();
        let png = engine::encode_png(&src, &EncodeOptions::fast()).unwrap();
        let info = inspect(&png).unwrap();
        assert_eq!(
            info,
            ImageInfo {
                width: 7,
                height: 3,
                format: Some("png".to_string()),
            }
        );
        assert!(inspect(b"nope").is_err());
    }

    #[test]
    fn supported_operations_are_listed_in_order() {
        assert_eq!(
            supported_operations(),
            vec!["downsampling", "upsampling", "aliasing", "sharpen", "contrast"]
        );
    }

    #[test]
    fn metrics_serialize_with_version() {
        let json = ProcessingMetrics::default().to_json();
        assert_eq!(json["version"], PROCESSING_METRICS_VERSION);
        assert_eq!(json["format_in"], serde_json::Value::Null);
    }

    #[test]
    fn version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
