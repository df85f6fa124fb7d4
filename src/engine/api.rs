// src/engine/api.rs
//
// ImageProcessor: the end-to-end request flow.
// bytes -> limits -> decode -> sanitize -> transform -> PNG, with per-stage metrics.

use super::decoder::{decode_image, format_name};
use super::dispatch::apply;
use super::encoder::{encode_png, EncodeOptions};
use super::limits::ProcessingLimits;
use super::params::RawParams;
use crate::error::Result;
use crate::ops::{Operation, OperationKind, ResultMetadata};
use crate::{ProcessingMetrics, PROCESSING_METRICS_VERSION};
use image::ImageFormat;
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Result of one end-to-end request.
#[derive(Clone, Debug)]
pub struct ProcessedOutput {
    /// Encoded PNG
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub metadata: ResultMetadata,
    pub metrics: ProcessingMetrics,
}

/// One entry of a batch: encoded input, operation name, raw parameters.
#[derive(Clone, Debug, Default)]
pub struct BatchRequest {
    pub bytes: Vec<u8>,
    pub operation: String,
    pub params: RawParams,
}

impl BatchRequest {
    pub fn new(bytes: impl Into<Vec<u8>>, operation: impl Into<String>, params: RawParams) -> Self {
        Self {
            bytes: bytes.into(),
            operation: operation.into(),
            params,
        }
    }
}

/// Measures decode -> ops -> encode in milliseconds.
struct MetricsRecorder {
    metrics: ProcessingMetrics,
    start_total: Instant,
    stage_start: Instant,
}

impl MetricsRecorder {
    fn new(start_total: Instant, bytes_in: usize) -> Self {
        Self {
            metrics: ProcessingMetrics {
                bytes_in: bytes_in as u64,
                ..ProcessingMetrics::default()
            },
            start_total,
            stage_start: Instant::now(),
        }
    }

    fn lap(&mut self) -> f64 {
        let ms = self.stage_start.elapsed().as_secs_f64() * 1000.0;
        self.stage_start = Instant::now();
        ms
    }

    fn mark_decode_done(&mut self, format: ImageFormat) {
        self.metrics.decode_ms = self.lap();
        self.metrics.format_in = Some(format_name(format));
    }

    fn mark_ops_done(&mut self) {
        self.metrics.ops_ms = self.lap();
    }

    fn finalize(mut self, bytes_out: usize) -> ProcessingMetrics {
        self.metrics.encode_ms = self.lap();
        self.metrics.total_ms = self.start_total.elapsed().as_secs_f64() * 1000.0;
        self.metrics.bytes_out = bytes_out as u64;
        if self.metrics.bytes_in > 0 {
            self.metrics.compression_ratio = bytes_out as f64 / self.metrics.bytes_in as f64;
        }
        self.metrics.version = PROCESSING_METRICS_VERSION.to_string();
        self.metrics
    }
}

/// Stateless request processor. Cheap to clone and safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct ImageProcessor {
    limits: ProcessingLimits,
    encode: EncodeOptions,
}

impl ImageProcessor {
    /// Limits disabled, default PNG optimisation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: ProcessingLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_encode_options(mut self, options: EncodeOptions) -> Self {
        self.encode = options;
        self
    }

    pub fn limits(&self) -> &ProcessingLimits {
        &self.limits
    }

    pub fn encode_options(&self) -> &EncodeOptions {
        &self.encode
    }

    /// Decode `bytes`, apply `operation` with sanitized `params`, encode PNG.
    ///
    /// The operation name is validated before any pixel work so an unknown
    /// operation never pays for a decode.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        operation: &str,
        params: &RawParams,
    ) -> Result<ProcessedOutput> {
        let started_at = Instant::now();
        let kind: OperationKind = operation.parse()?;
        self.limits.enforce_source_len(bytes.len())?;

        let mut recorder = MetricsRecorder::new(started_at, bytes.len());
        let (buffer, format) = decode_image(bytes)?;
        recorder.mark_decode_done(format);
        self.limits.enforce_pixels(buffer.width(), buffer.height())?;
        self.limits.enforce_timeout(started_at, "decode")?;

        let op = Operation::from_params(kind, params);
        let (out_w, out_h) = op.output_dimensions(buffer.width(), buffer.height());
        self.limits.enforce_output_pixels(out_w, out_h)?;

        let image = apply(&op, &buffer);
        drop(buffer);
        recorder.mark_ops_done();
        self.limits.enforce_timeout(started_at, "ops")?;

        let png = encode_png(&image, &self.encode)?;
        self.limits.enforce_timeout(started_at, "encode")?;
        let metrics = recorder.finalize(png.len());

        debug!(
            target: "sampling_lab::api",
            operation = %kind,
            input_format = %format_name(format),
            width = image.width(),
            height = image.height(),
            total_ms = metrics.total_ms,
            bytes_out = metrics.bytes_out,
            "request processed"
        );

        Ok(ProcessedOutput {
            png,
            width: image.width(),
            height: image.height(),
            metadata: op.metadata(),
            metrics,
        })
    }

    /// Process independent requests in parallel. Results keep input order;
    /// one failure does not affect the others.
    pub fn process_batch(&self, requests: &[BatchRequest]) -> Vec<Result<ProcessedOutput>> {
        requests
            .par_iter()
            .map(|req| self.process_bytes(&req.bytes, &req.operation, &req.params))
            .collect()
    }
}
