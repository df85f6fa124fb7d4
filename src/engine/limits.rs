// src/engine/limits.rs
//
// Processing limits: policy presets and enforcement helpers.
//
// The transforms themselves are unbounded pure functions; limits are checked
// by the end-to-end processor between stages.

use crate::error::{ProcessError, Result};
use std::str::FromStr;
use std::time::Instant;
use tracing::warn;

/// Environment variable selecting the limits policy for `from_env()`.
pub const LIMITS_ENV: &str = "SAMPLING_LAB_LIMITS";

const STRICT_MAX_BYTES: u64 = 12 * 1024 * 1024; // 12MB upload cap
const LENIENT_MAX_BYTES: u64 = 48 * 1024 * 1024; // 48MB input cap
const STRICT_MAX_PIXELS: u64 = 40_000_000; // ~8K x 5K
const LENIENT_MAX_PIXELS: u64 = 75_000_000; // below global MAX_PIXELS
const STRICT_MAX_OUTPUT_PIXELS: u64 = 64_000_000; // 4K x 2 upsampling headroom
const LENIENT_MAX_OUTPUT_PIXELS: u64 = 256_000_000;
const STRICT_TIMEOUT_MS: u64 = 10_000;
const LENIENT_TIMEOUT_MS: u64 = 60_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitsPolicy {
    Disabled,
    Strict,
    Lenient,
    Custom,
}

impl FromStr for LimitsPolicy {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(ProcessError::invalid_limits_policy(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingLimits {
    pub enabled: bool,
    pub policy: LimitsPolicy,
    pub max_bytes: Option<u64>,
    pub max_pixels: Option<u64>,
    pub max_output_pixels: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl Default for ProcessingLimits {
    fn default() -> Self {
        Self {
            enabled: false,
            policy: LimitsPolicy::Disabled,
            max_bytes: None,
            max_pixels: None,
            max_output_pixels: None,
            timeout_ms: None,
        }
    }
}

impl ProcessingLimits {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            enabled: true,
            policy: LimitsPolicy::Strict,
            max_bytes: Some(STRICT_MAX_BYTES),
            max_pixels: Some(STRICT_MAX_PIXELS),
            max_output_pixels: Some(STRICT_MAX_OUTPUT_PIXELS),
            timeout_ms: Some(STRICT_TIMEOUT_MS),
        }
    }

    pub fn lenient() -> Self {
        Self {
            enabled: true,
            policy: LimitsPolicy::Lenient,
            max_bytes: Some(LENIENT_MAX_BYTES),
            max_pixels: Some(LENIENT_MAX_PIXELS),
            max_output_pixels: Some(LENIENT_MAX_OUTPUT_PIXELS),
            timeout_ms: Some(LENIENT_TIMEOUT_MS),
        }
    }

    /// Enabled, with every limit unset; fill in the fields you need.
    pub fn custom() -> Self {
        Self {
            enabled: true,
            policy: LimitsPolicy::Custom,
            ..Self::default()
        }
    }

    pub fn apply_policy(policy: LimitsPolicy) -> Self {
        match policy {
            LimitsPolicy::Disabled => Self::disabled(),
            LimitsPolicy::Strict => Self::strict(),
            LimitsPolicy::Lenient => Self::lenient(),
            LimitsPolicy::Custom => Self::custom(),
        }
    }

    /// Policy from `SAMPLING_LAB_LIMITS`; unset means disabled.
    pub fn from_env() -> Result<Self> {
        Self::from_policy_var(std::env::var(LIMITS_ENV).ok().as_deref())
    }

    /// Resolve the value of `SAMPLING_LAB_LIMITS` (None when unset).
    pub fn from_policy_var(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(raw) => Ok(Self::apply_policy(raw.parse()?)),
            None => Ok(Self::disabled()),
        }
    }

    pub fn enforce_source_len(&self, len: usize) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_bytes {
            let len_u64 = len as u64;
            if len_u64 > limit {
                return Err(violation(format!(
                    "input size {len_u64} bytes exceeds limit of {limit} bytes"
                )));
            }
        }
        Ok(())
    }

    pub fn enforce_pixels(&self, width: u32, height: u32) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > limit {
                return Err(violation(format!(
                    "input {width}x{height} ({pixels} pixels) exceeds limit of {limit} pixels"
                )));
            }
        }
        Ok(())
    }

    /// Checked before running an operation, against its projected output size.
    pub fn enforce_output_pixels(&self, width: u32, height: u32) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_output_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > limit {
                return Err(violation(format!(
                    "output {width}x{height} ({pixels} pixels) exceeds limit of {limit} pixels. \
                     Use a smaller scale or a lenient policy"
                )));
            }
        }
        Ok(())
    }

    pub fn enforce_timeout(&self, started_at: Instant, stage: &'static str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit_ms) = self.timeout_ms {
            let elapsed_ms = started_at.elapsed().as_millis() as u64;
            if elapsed_ms > limit_ms {
                return Err(violation(format!(
                    "processing exceeded {limit_ms}ms timeout at {stage} stage (elapsed: {elapsed_ms}ms)"
                )));
            }
        }
        Ok(())
    }
}

fn violation(reason: String) -> ProcessError {
    warn!(target: "sampling_lab::limits", %reason, "limit violation");
    ProcessError::limit_violation(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn disabled_policy_allows_everything() {
        let limits = ProcessingLimits::disabled();
        assert!(limits.enforce_source_len(usize::MAX).is_ok());
        assert!(limits.enforce_pixels(u32::MAX, u32::MAX).is_ok());
        assert!(limits.enforce_output_pixels(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn strict_policy_enforces_bytes_and_pixels() {
        let limits = ProcessingLimits::strict();
        assert!(limits.enforce_source_len(1024).is_ok());
        assert!(limits.enforce_source_len(13 * 1024 * 1024).is_err());
        assert!(limits.enforce_pixels(2000, 2000).is_ok());
        assert!(limits.enforce_pixels(7000, 7000).is_err());
        assert!(limits.enforce_output_pixels(4000, 4000).is_ok());
        let err = limits.enforce_output_pixels(16000, 8000).unwrap_err();
        assert!(matches!(err, ProcessError::LimitViolation { .. }));
        assert!(err.to_string().contains("16000x8000"));
    }

    #[test]
    fn timeout_enforced() {
        let limits = ProcessingLimits {
            timeout_ms: Some(1),
            ..ProcessingLimits::custom()
        };
        let fake_start = Instant::now() - Duration::from_millis(5);
        assert!(limits.enforce_timeout(fake_start, "decode").is_err());
        assert!(ProcessingLimits::custom()
            .enforce_timeout(fake_start, "decode")
            .is_ok());
    }

    #[test]
    fn policy_var_resolution() {
        assert_eq!(
            ProcessingLimits::from_policy_var(None).unwrap(),
            ProcessingLimits::disabled()
        );
        assert_eq!(
            ProcessingLimits::from_policy_var(Some("strict")).unwrap(),
            ProcessingLimits::strict()
        );
        assert_eq!(
            ProcessingLimits::from_policy_var(Some(" LENIENT ")).unwrap(),
            ProcessingLimits::lenient()
        );
        assert_eq!(
            ProcessingLimits::from_policy_var(Some("paranoid")).unwrap_err(),
            ProcessError::invalid_limits_policy("paranoid")
        );
    }

    #[test]
    fn from_env_reads_limits_variable() {
        // The only test in the crate touching this variable.
        std::env::set_var(LIMITS_ENV, "strict");
        let strict = ProcessingLimits::from_env();
        std::env::set_var(LIMITS_ENV, "bogus");
        let invalid = ProcessingLimits::from_env();
        std::env::remove_var(LIMITS_ENV);
        let unset = ProcessingLimits::from_env();

        assert_eq!(strict.unwrap(), ProcessingLimits::strict());
        assert!(matches!(
            invalid.unwrap_err(),
            ProcessError::InvalidLimitsPolicy { .. }
        ));
        assert_eq!(unset.unwrap(), ProcessingLimits::disabled());
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("Strict".parse::<LimitsPolicy>().unwrap(), LimitsPolicy::Strict);
        assert_eq!(" off ".parse::<LimitsPolicy>().unwrap(), LimitsPolicy::Disabled);
        assert_eq!(
            "loose".parse::<LimitsPolicy>().unwrap_err(),
            ProcessError::invalid_limits_policy("loose")
        );
        assert_eq!(
            ProcessingLimits::apply_policy(LimitsPolicy::Lenient),
            ProcessingLimits::lenient()
        );
    }
}
