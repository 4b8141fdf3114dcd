use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value as JsonValue};

/// Physical type of a column flowing through a sampling pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    Int,
    Long,
    Double,
    /// Microseconds since the Unix epoch (UTC)
    Timestamp,
    /// Dictionary-encoded string; rows carry an `i32` key into a symbol table
    Symbol,
    String,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::Double => "double",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Symbol => "symbol",
            ColumnType::String => "string",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Long)
    }

    /// Types an arithmetic or ordering aggregate can consume.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Int | ColumnType::Long | ColumnType::Double | ColumnType::Timestamp
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "int" | "integer" => Ok(ColumnType::Int),
            "long" => Ok(ColumnType::Long),
            "double" | "float" => Ok(ColumnType::Double),
            "timestamp" => Ok(ColumnType::Timestamp),
            "symbol" => Ok(ColumnType::Symbol),
            "string" => Ok(ColumnType::String),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Timestamp(i64),
    Utf8(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            ScalarValue::Null => JsonValue::Null,
            ScalarValue::Boolean(b) => JsonValue::Bool(*b),
            ScalarValue::Int64(i) => JsonValue::Number(Number::from(*i)),
            ScalarValue::Float64(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            ScalarValue::Timestamp(ts) => JsonValue::Number(Number::from(*ts)),
            ScalarValue::Utf8(s) => JsonValue::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int64(i) => Some(*i),
            ScalarValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float64(f) => Some(*f),
            ScalarValue::Int64(i) => Some(*i as f64),
            ScalarValue::Timestamp(ts) => Some(*ts as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Int64(i) => write!(f, "{}", i),
            ScalarValue::Float64(v) => write!(f, "{}", v),
            ScalarValue::Timestamp(ts) => write!(f, "{}", ts),
            ScalarValue::Utf8(s) => f.write_str(s),
        }
    }
}
