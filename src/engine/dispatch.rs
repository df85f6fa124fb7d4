// src/engine/dispatch.rs
//
// Operation dispatch: name + raw parameters -> sanitized Operation -> transform.

use super::aliasing::demonstrate_aliasing;
use super::buffer::PixelBuffer;
use super::contrast::adjust_contrast;
use super::params::RawParams;
use super::resample::{downsample, upsample};
use super::sharpen::unsharp_mask;
use crate::error::Result;
use crate::ops::{Operation, OperationKind, ResultMetadata};
use tracing::debug;

/// Output of a single dispatch: the transformed buffer and the parameters
/// that were actually applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Processed {
    pub image: PixelBuffer,
    pub metadata: ResultMetadata,
}

/// Parse `operation`, sanitize the parameters it uses, and run it.
///
/// Fails only for an unknown operation name; parameters never cause a
/// failure. `buffer` is never modified.
pub fn process(buffer: &PixelBuffer, operation: &str, params: &RawParams) -> Result<Processed> {
    let kind: OperationKind = operation.parse()?;
    let op = Operation::from_params(kind, params);
    let image = apply(&op, buffer);
    debug!(
        target: "sampling_lab::dispatch",
        operation = %kind,
        input_width = buffer.width(),
        input_height = buffer.height(),
        output_width = image.width(),
        output_height = image.height(),
        "operation applied"
    );
    Ok(Processed {
        image,
        metadata: op.metadata(),
    })
}

/// Run an already-resolved operation.
pub fn apply(op: &Operation, buffer: &PixelBuffer) -> PixelBuffer {
    match *op {
        Operation::Downsampling { factor, antialias } => downsample(buffer, factor, antialias),
        Operation::Upsampling { scale, method } => upsample(buffer, scale, method),
        Operation::Aliasing { factor, method } => demonstrate_aliasing(buffer, factor, method),
        Operation::Sharpen { amount, radius } => unsharp_mask(buffer, amount, radius),
        Operation::Contrast { alpha, beta } => adjust_contrast(buffer, alpha, beta),
    }
}
