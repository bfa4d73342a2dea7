//! Scalar attribute values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// The type an attribute can take.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Boolean,
    Number,
}

impl AttributeType {
    /// Map a GEXF or GraphML wire type to an attribute type.
    ///
    /// Unknown wire types (`liststring`, `anyURI`, ...) degrade to string.
    pub fn from_wire(wire: &str) -> Self {
        match wire {
            "int" | "integer" | "long" | "float" | "double" => AttributeType::Number,
            "boolean" => AttributeType::Boolean,
            _ => AttributeType::String,
        }
    }

    /// Wire type written for a declared attribute of this type.
    pub fn to_wire(self) -> &'static str {
        match self {
            AttributeType::Number => "double",
            AttributeType::Boolean => "boolean",
            AttributeType::String => "string",
        }
    }
}

/// A free-form attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Scalar {
    /// Runtime type of this value.
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Scalar::Boolean(_) => AttributeType::Boolean,
            Scalar::Number(_) => AttributeType::Number,
            Scalar::String(_) => AttributeType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; numeric strings are accepted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::String(s) => s.trim().parse::<f64>().ok(),
            Scalar::Boolean(_) => None,
        }
    }

    /// Text used inside XML attributes and `data` elements.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Number(n) => format_number(*n),
            Scalar::String(s) => s.clone(),
        }
    }

    /// Interpret XML text according to a declared type.
    ///
    /// Returns `None` when the text does not fit the declared type.
    pub fn parse_typed(text: &str, ty: AttributeType) -> Option<Scalar> {
        match ty {
            AttributeType::String => Some(Scalar::String(text.to_string())),
            AttributeType::Number => text.trim().parse::<f64>().ok().map(Scalar::Number),
            AttributeType::Boolean => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Scalar::Boolean(true)),
                "false" | "0" => Some(Scalar::Boolean(false)),
                _ => None,
            },
        }
    }

    /// Convert a JSON value. `null` yields `None`; arrays and objects are kept
    /// as their compact JSON text.
    pub fn from_json(value: &Value) -> Option<Scalar> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Scalar::Boolean(*b)),
            Value::Number(n) => n.as_f64().map(Scalar::Number),
            Value::String(s) => Some(Scalar::String(s.clone())),
            other => Some(Scalar::String(other.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Boolean(b) => Value::Bool(*b),
            Scalar::Number(n) => number_to_json(*n),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

/// Largest magnitude rendered without a fractional part (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn is_exact_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER
}

/// Render a number the way it is written in the wire formats: integral values
/// without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if is_exact_integer(n) {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// JSON rendering of a number; integral values become JSON integers and
/// non-finite values become `null`.
pub fn number_to_json(n: f64) -> Value {
    if is_exact_integer(n) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
