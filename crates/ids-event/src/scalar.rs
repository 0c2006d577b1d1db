//! Scalar Values
//!
//! Event names and tested values are single primitives: a string, an integer,
//! a float, or a boolean. Composite input (arrays, objects) and null are not
//! scalars and are rejected when converting from JSON.
//!
//! # Example
//!
//! ```
//! use ids_event::Scalar;
//!
//! let name = Scalar::from("username");
//! assert_eq!(name.to_string(), "username");
//! assert_eq!(Scalar::from(42).type_name(), "integer");
//! ```

use serde_json::Value;
use std::convert::Infallible;
use std::fmt;

/// A single primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Returns the name of the primitive type held.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "string",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "double",
            Scalar::Bool(_) => "boolean",
        }
    }

    /// Returns the string slice if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<u32> for Scalar {
    fn from(i: u32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Error returned when a JSON value is not a scalar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a scalar, {found} given")]
pub struct NotScalar {
    /// JSON kind that was found instead
    pub found: &'static str,
}

impl From<Infallible> for NotScalar {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl TryFrom<Value> for Scalar {
    type Error = NotScalar;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Scalar::Str(s)),
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Int(i)),
                // u64 beyond i64 and real numbers both land here
                None => n
                    .as_f64()
                    .map(Scalar::Float)
                    .ok_or(NotScalar { found: "number" }),
            },
            other => Err(NotScalar {
                found: json_kind(&other),
            }),
        }
    }
}

impl TryFrom<&Value> for Scalar {
    type Error = NotScalar;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Scalar::try_from(value.clone())
    }
}

/// Returns a short name for the kind of a JSON value.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
