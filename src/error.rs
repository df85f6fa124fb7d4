// src/error.rs
//
// Unified error handling for sampling-lab
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - UserError: Invalid input, recoverable
// - CodecError: Format/encoding issues
// - ResourceLimit: Memory/time/dimension limits
// - InternalBug: Library bugs (should not happen)
//
// Parameter parse failures are NOT errors: the sanitizer resolves them to
// documented defaults (see engine/params.rs).

use std::borrow::Cow;
use thiserror::Error;

/// Error taxonomy for callers that translate failures into protocol responses
/// (HTTP status codes, CLI exit codes, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Invalid input, recoverable by user
    UserError,
    /// Format/encoding issues
    CodecError,
    /// Memory/time/dimension limits
    ResourceLimit,
    /// Library bugs (should not happen)
    InternalBug,
}

impl ErrorCategory {
    /// Get string representation of error category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "UserError",
            ErrorCategory::CodecError => "CodecError",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::InternalBug => "InternalBug",
        }
    }

    /// Get the SAMPLING_LAB_* error code string for this category
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "SAMPLING_LAB_USER_ERROR",
            ErrorCategory::CodecError => "SAMPLING_LAB_CODEC_ERROR",
            ErrorCategory::ResourceLimit => "SAMPLING_LAB_RESOURCE_LIMIT",
            ErrorCategory::InternalBug => "SAMPLING_LAB_INTERNAL_BUG",
        }
    }
}

/// sampling-lab error types
///
/// Every failure path returns one of these variants; each carries enough
/// context for a human-readable message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProcessError {
    // Request Errors
    #[error("Unknown operation: '{name}'. Expected downsampling, upsampling, aliasing, sharpen or contrast")]
    UnknownOperation { name: Cow<'static, str> },

    // Decode Errors
    #[error("Unsupported image format: {format}. Use PNG, JPEG, BMP or WebP")]
    UnsupportedFormat { format: Cow<'static, str> },

    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    // Encode Errors
    #[error("Failed to encode as {format}: {message}")]
    EncodeFailed {
        format: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    // Buffer Errors
    #[error("Invalid buffer dimensions: {width}x{height}. Both must be at least 1")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual} bytes")]
    BufferSizeMismatch { expected: usize, actual: usize },

    // Size Limit Errors
    #[error("Image dimension {dimension} exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Image pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    #[error("Processing limits rejected the request: {reason}")]
    LimitViolation { reason: Cow<'static, str> },

    // Configuration Errors
    #[error("Unknown limits policy: '{policy}'. Expected disabled, strict or lenient")]
    InvalidLimitsPolicy { policy: Cow<'static, str> },

    // Internal Errors
    #[error("Internal error: {message}")]
    InternalPanic { message: Cow<'static, str> },
}

// Constructor Helpers
impl ProcessError {
    pub fn unknown_operation(name: impl Into<Cow<'static, str>>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    pub fn unsupported_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(
        format: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidDimensions { width, height }
    }

    pub fn buffer_size_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn limit_violation(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::LimitViolation {
            reason: reason.into(),
        }
    }

    pub fn invalid_limits_policy(policy: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidLimitsPolicy {
            policy: policy.into(),
        }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (user can fix it)
    ///
    /// Consistent with category():
    /// - UserError and ResourceLimit errors are recoverable
    /// - CodecError and InternalBug errors are not
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::ResourceLimit => true,
            ErrorCategory::CodecError | ErrorCategory::InternalBug => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownOperation { .. }
            | Self::InvalidDimensions { .. }
            | Self::BufferSizeMismatch { .. }
            | Self::InvalidLimitsPolicy { .. } => ErrorCategory::UserError,

            Self::UnsupportedFormat { .. }
            | Self::DecodeFailed { .. }
            | Self::EncodeFailed { .. } => ErrorCategory::CodecError,

            Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::LimitViolation { .. } => ErrorCategory::ResourceLimit,

            Self::InternalPanic { .. } => ErrorCategory::InternalBug,
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, ProcessError>;
