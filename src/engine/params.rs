// src/engine/params.rs
//
// Parameter sanitizer: untyped strings -> bounded values.
//
// Leniency policy: invalid or missing input resolves to the documented
// default and never produces an error. Only the operation name itself can
// fail (see ops::OperationKind).

use crate::ops::Interpolation;
use std::collections::HashMap;
use std::num::IntErrorKind;
use tracing::debug;

/// Raw string parameters as received from the caller (form fields, query
/// strings, CLI flags, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawParams(HashMap<String, String>);

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse `raw` as an integer and clamp it into `[min, max]`.
/// Unparseable input yields `default`; out-of-range digit strings clamp.
pub fn clamp_int(raw: &str, min: i64, max: i64, default: i64) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(value) => value.clamp(min, max),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => max,
            IntErrorKind::NegOverflow => min,
            _ => default,
        },
    }
}

/// Parse `raw` as a float and clamp it into `[min, max]`.
/// Unparseable input yields `default`; infinities clamp to a bound and NaN
/// resolves to `max`.
pub fn clamp_float(raw: &str, min: f64, max: f64, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_nan() => max,
        Ok(value) => value.clamp(min, max),
        Err(_) => default,
    }
}

/// Parse a boolean flag. An empty value (a form field posted blank) is false;
/// unknown spellings yield `default`.
pub fn parse_flag(raw: &str, default: bool) -> bool {
    let raw = raw.trim();
    if ["1", "true", "yes", "on"]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(raw))
    {
        true
    } else if ["", "0", "false", "no", "off"]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(raw))
    {
        false
    } else {
        default
    }
}

/// Bounded integer parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntParam {
    pub name: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl IntParam {
    pub fn resolve(&self, params: &RawParams) -> i64 {
        match params.get(self.name) {
            Some(raw) => {
                let value = clamp_int(raw, self.min, self.max, self.default);
                log_resolution(self.name, raw, &value);
                value
            }
            None => self.default,
        }
    }
}

/// Bounded float parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatParam {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FloatParam {
    pub fn resolve(&self, params: &RawParams) -> f64 {
        match params.get(self.name) {
            Some(raw) => {
                let value = clamp_float(raw, self.min, self.max, self.default);
                log_resolution(self.name, raw, &value);
                value
            }
            None => self.default,
        }
    }
}

/// Boolean parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagParam {
    pub name: &'static str,
    pub default: bool,
}

impl FlagParam {
    pub fn resolve(&self, params: &RawParams) -> bool {
        match params.get(self.name) {
            Some(raw) => {
                let value = parse_flag(raw, self.default);
                log_resolution(self.name, raw, &value);
                value
            }
            None => self.default,
        }
    }
}

/// Interpolation method parameter (allow-list).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodParam {
    pub name: &'static str,
    pub default: Interpolation,
}

impl MethodParam {
    pub fn resolve(&self, params: &RawParams) -> Interpolation {
        match params.get(self.name) {
            Some(raw) => Interpolation::parse(raw).unwrap_or_else(|| {
                debug!(
                    target: "sampling_lab::params",
                    param = self.name,
                    raw,
                    fallback = self.default.as_str(),
                    "method outside allow-list, using default"
                );
                self.default
            }),
            None => self.default,
        }
    }
}

fn log_resolution<T: std::fmt::Debug>(name: &'static str, raw: &str, resolved: &T) {
    debug!(
        target: "sampling_lab::params",
        param = name,
        raw,
        resolved = ?resolved,
        "parameter resolved"
    );
}

// =============================================================================
// PARAMETER TABLE
// =============================================================================

pub const DOWNSAMPLING_FACTOR: IntParam = IntParam {
    name: "factor",
    min: 2,
    max: 32,
    default: 8,
};

pub const ANTIALIAS: FlagParam = FlagParam {
    name: "antialias",
    default: true,
};

pub const SCALE: IntParam = IntParam {
    name: "scale",
    min: 2,
    max: 8,
    default: 2,
};

pub const METHOD: MethodParam = MethodParam {
    name: "method",
    default: Interpolation::Nearest,
};

pub const ALIASING_FACTOR: IntParam = IntParam {
    name: "factor",
    min: 2,
    max: 32,
    default: 8,
};

pub const AMOUNT: FloatParam = FloatParam {
    name: "amount",
    min: 0.0,
    max: 3.0,
    default: 1.0,
};

pub const RADIUS: IntParam = IntParam {
    name: "radius",
    min: 1,
    max: 15,
    default: 3,
};

pub const ALPHA: FloatParam = FloatParam {
    name: "alpha",
    min: 0.5,
    max: 3.0,
    default: 1.3,
};

pub const BETA: IntParam = IntParam {
    name: "beta",
    min: -100,
    max: 100,
    default: 0,
};
