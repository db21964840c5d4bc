//! Scalar values.
//!
//! [`DataValue`] is used for literal columns, range bounds, rows handed to the
//! session and observed values reported by expectations.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single cell value.
///
/// Deserializes from plain scalars: `null`, booleans, integers, floats, and
/// strings. Strings shaped like `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` become
/// dates and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp without time zone
    Timestamp(NaiveDateTime),
    /// String value
    String(String),
}

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Date(_) => "date",
            DataValue::Timestamp(_) => "timestamp",
            DataValue::String(_) => "string",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Compares two values.
    ///
    /// Integers and floats compare numerically with each other; every other
    /// pairing must be of the same kind. Returns `None` for incomparable
    /// pairs, including anything involving `Null` or NaN.
    pub fn compare(&self, other: &DataValue) -> Option<Ordering> {
        match (self, other) {
            (DataValue::Int(a), DataValue::Int(b)) => Some(a.cmp(b)),
            (DataValue::Int(_) | DataValue::Float(_), DataValue::Int(_) | DataValue::Float(_)) => {
                self.as_float()?.partial_cmp(&other.as_float()?)
            }
            (DataValue::Bool(a), DataValue::Bool(b)) => Some(a.cmp(b)),
            (DataValue::String(a), DataValue::String(b)) => Some(a.cmp(b)),
            (DataValue::Date(a), DataValue::Date(b)) => Some(a.cmp(b)),
            (DataValue::Timestamp(a), DataValue::Timestamp(b)) => Some(a.cmp(b)),
            (DataValue::Date(a), DataValue::Timestamp(b)) => {
                a.and_hms_opt(0, 0, 0).map(|start| start.cmp(b))
            }
            (DataValue::Timestamp(a), DataValue::Date(b)) => {
                b.and_hms_opt(0, 0, 0).map(|start| a.cmp(&start))
            }
            _ => None,
        }
    }

    /// Key used for equality grouping.
    ///
    /// Values of different kinds never share a key. Floats are keyed by the
    /// bit pattern of their canonical form, so `-0.0` equals `0.0` and all
    /// NaNs are equal.
    pub fn grouping_key(&self) -> String {
        match self {
            DataValue::Null => "n:".to_string(),
            DataValue::Bool(b) => format!("b:{b}"),
            DataValue::Int(i) => format!("i:{i}"),
            DataValue::Float(f) => {
                let canonical = if *f == 0.0 {
                    0.0f64
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                format!("f:{:x}", canonical.to_bits())
            }
            DataValue::Date(d) => format!("d:{d}"),
            DataValue::Timestamp(ts) => format!("t:{ts}"),
            DataValue::String(s) => format!("s:{s}"),
        }
    }

    /// Converts this value to JSON for result diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::from(*b),
            DataValue::Int(i) => serde_json::Value::from(*i),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::Date(d) => serde_json::Value::String(d.to_string()),
            DataValue::Timestamp(ts) => serde_json::Value::String(ts.to_string()),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => f.write_str("null"),
            DataValue::Bool(b) => write!(f, "{b}"),
            DataValue::Int(i) => write!(f, "{i}"),
            DataValue::Float(x) => write!(f, "{x}"),
            DataValue::Date(d) => write!(f, "{d}"),
            DataValue::Timestamp(ts) => write!(f, "{ts}"),
            DataValue::String(s) => f.write_str(s),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<i32> for DataValue {
    fn from(i: i32) -> Self {
        DataValue::Int(i as i64)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<NaiveDate> for DataValue {
    fn from(d: NaiveDate) -> Self {
        DataValue::Date(d)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(ts: NaiveDateTime) -> Self {
        DataValue::Timestamp(ts)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}
