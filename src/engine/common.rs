// src/engine/common.rs
//
// Common utilities shared across engine modules.

use crate::error::{ProcessError, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Round and saturate a filtered sample into the u8 channel range.
#[inline]
pub(crate) fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Run codec code under the global panic policy: a panic inside a
/// third-party decoder/encoder becomes `InternalPanic` instead of unwinding
/// through the caller.
pub(crate) fn run_with_panic_policy<T, F>(stage: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            warn!(target: "sampling_lab::panic", %stage, %detail, "panic caught at codec boundary");
            Err(ProcessError::internal_panic(format!(
                "panic during {stage}: {detail}"
            )))
        }
    }
}
