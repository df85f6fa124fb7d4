// src/ops.rs
//
// The closed set of operations and their resolved parameters.
// Operations are cheap to build - the expensive work happens in engine::dispatch.

use crate::engine::params::{
    RawParams, ALIASING_FACTOR, ALPHA, AMOUNT, ANTIALIAS, BETA, DOWNSAMPLING_FACTOR, METHOD,
    RADIUS, SCALE,
};
use crate::error::ProcessError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;

/// Operation identifiers accepted by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Downsampling,
    Upsampling,
    Aliasing,
    Sharpen,
    Contrast,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Downsampling,
        OperationKind::Upsampling,
        OperationKind::Aliasing,
        OperationKind::Sharpen,
        OperationKind::Contrast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Downsampling => "downsampling",
            OperationKind::Upsampling => "upsampling",
            OperationKind::Aliasing => "aliasing",
            OperationKind::Sharpen => "sharpen",
            OperationKind::Contrast => "contrast",
        }
    }
}

impl FromStr for OperationKind {
    type Err = ProcessError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ProcessError::unknown_operation(trimmed.to_string()))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpolation kernel used for magnification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Bicubic => "bicubic",
        }
    }

    /// Allow-list lookup. Returns None for anything outside the list;
    /// callers fall back to the default method.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        [
            Interpolation::Nearest,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation together with its resolved (sanitized) parameters.
///
/// Each variant is self-contained: every field is already inside its
/// declared bounds, so the engine never sees raw input.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Decimate by an integer factor, optionally box-filtering first
    Downsampling { factor: u32, antialias: bool },

    /// Magnify by an integer scale with the given kernel
    Upsampling { scale: u32, method: Interpolation },

    /// Decimate without filtering, then magnify back to the original size
    Aliasing { factor: u32, method: Interpolation },

    /// Unsharp mask (amount 0.0-3.0, Gaussian sigma = radius)
    Sharpen { amount: f64, radius: u32 },

    /// Affine intensity map: v * alpha + beta
    Contrast { alpha: f64, beta: i32 },
}

impl Operation {
    /// Sanitize the parameters relevant to `kind`; everything else in
    /// `params` is ignored. Never fails.
    pub fn from_params(kind: OperationKind, params: &RawParams) -> Self {
        match kind {
            OperationKind::Downsampling => Operation::Downsampling {
                factor: DOWNSAMPLING_FACTOR.resolve(params) as u32,
                antialias: ANTIALIAS.resolve(params),
            },
            OperationKind::Upsampling => Operation::Upsampling {
                scale: SCALE.resolve(params) as u32,
                method: METHOD.resolve(params),
            },
            OperationKind::Aliasing => Operation::Aliasing {
                factor: ALIASING_FACTOR.resolve(params) as u32,
                method: METHOD.resolve(params),
            },
            OperationKind::Sharpen => Operation::Sharpen {
                amount: AMOUNT.resolve(params),
                radius: RADIUS.resolve(params) as u32,
            },
            OperationKind::Contrast => Operation::Contrast {
                alpha: ALPHA.resolve(params),
                beta: BETA.resolve(params) as i32,
            },
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Downsampling { .. } => OperationKind::Downsampling,
            Operation::Upsampling { .. } => OperationKind::Upsampling,
            Operation::Aliasing { .. } => OperationKind::Aliasing,
            Operation::Sharpen { .. } => OperationKind::Sharpen,
            Operation::Contrast { .. } => OperationKind::Contrast,
        }
    }

    /// Output dimensions for an input of `width` x `height`, computed
    /// without touching pixels. Used to enforce output limits up front.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Operation::Downsampling { factor, .. } => {
                ((width / factor).max(1), (height / factor).max(1))
            }
            Operation::Upsampling { scale, .. } => {
                (width.saturating_mul(*scale), height.saturating_mul(*scale))
            }
            Operation::Aliasing { .. } | Operation::Sharpen { .. } | Operation::Contrast { .. } => {
                (width, height)
            }
        }
    }

    /// Record of the resolved parameters, in table order.
    pub fn metadata(&self) -> ResultMetadata {
        let params = match self {
            Operation::Downsampling { factor, antialias } => vec![
                (DOWNSAMPLING_FACTOR.name, ParamValue::Int(i64::from(*factor))),
                (ANTIALIAS.name, ParamValue::Bool(*antialias)),
            ],
            Operation::Upsampling { scale, method } => vec![
                (SCALE.name, ParamValue::Int(i64::from(*scale))),
                (METHOD.name, ParamValue::Method(*method)),
            ],
            Operation::Aliasing { factor, method } => vec![
                (ALIASING_FACTOR.name, ParamValue::Int(i64::from(*factor))),
                (METHOD.name, ParamValue::Method(*method)),
            ],
            Operation::Sharpen { amount, radius } => vec![
                (AMOUNT.name, ParamValue::Float(*amount)),
                (RADIUS.name, ParamValue::Int(i64::from(*radius))),
            ],
            Operation::Contrast { alpha, beta } => vec![
                (ALPHA.name, ParamValue::Float(*alpha)),
                (BETA.name, ParamValue::Int(i64::from(*beta))),
            ],
        };
        ResultMetadata {
            operation: self.kind(),
            params,
        }
    }
}

/// A resolved parameter value as reported back to the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Method(Interpolation),
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Int(v) => serializer.serialize_i64(*v),
            ParamValue::Float(v) => serializer.serialize_f64(*v),
            ParamValue::Bool(v) => serializer.serialize_bool(*v),
            ParamValue::Method(m) => serializer.serialize_str(m.as_str()),
        }
    }
}

/// Operation name plus resolved parameters, in a stable order.
///
/// Serializes as a flat JSON object:
/// `{"operation": "sharpen", "amount": 1.0, "radius": 3}`
#[derive(Clone, Debug, PartialEq)]
pub struct ResultMetadata {
    pub operation: OperationKind,
    pub params: Vec<(&'static str, ParamValue)>,
}

impl ResultMetadata {
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Serializing a map of plain scalars cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for ResultMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len() + 1))?;
        map.serialize_entry("operation", self.operation.as_str())?;
        for (name, value) in &self.params {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
