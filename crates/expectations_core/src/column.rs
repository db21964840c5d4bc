//! Column type system.
//!
//! Column types form a closed set of primitives. Type names coming from callers
//! or suite files are validated here, at the call boundary, and mapped to the
//! Arrow type used to store the column.

use crate::{ExpectationError, Result};
use arrow_schema::{DataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive column types supported by datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Timestamp with microsecond precision and no time zone
    Timestamp,
}

impl ColumnType {
    /// All supported types, in declaration order.
    pub const ALL: [ColumnType; 8] = [
        ColumnType::Integer,
        ColumnType::Long,
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::String,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Timestamp,
    ];

    /// Parses a type name.
    ///
    /// Matching is case-insensitive and accepts the usual engine aliases
    /// (`int`, `bigint`, `real`, `varchar`, `bool`, ...).
    pub fn parse(name: &str) -> Result<Self> {
        let column_type = match name.trim().to_lowercase().as_str() {
            "int" | "integer" | "int32" => ColumnType::Integer,
            "bigint" | "long" | "int64" => ColumnType::Long,
            "float" | "real" | "float32" => ColumnType::Float,
            "double" | "float64" => ColumnType::Double,
            "string" | "str" | "varchar" | "utf8" => ColumnType::String,
            "boolean" | "bool" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "timestamp" | "datetime" => ColumnType::Timestamp,
            _ => return Err(ExpectationError::invalid_type(name)),
        };
        Ok(column_type)
    }

    /// Canonical lowercase name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Long => "long",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
        }
    }

    /// Arrow type used to store columns of this type.
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnType::Integer => DataType::Int32,
            ColumnType::Long => DataType::Int64,
            ColumnType::Float => DataType::Float32,
            ColumnType::Double => DataType::Float64,
            ColumnType::String => DataType::Utf8,
            ColumnType::Boolean => DataType::Boolean,
            ColumnType::Date => DataType::Date32,
            ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
        }
    }

    /// Maps an Arrow type back to a column type.
    ///
    /// Returns `None` for Arrow types outside the supported set.
    pub fn from_data_type(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int32 => Some(ColumnType::Integer),
            DataType::Int64 => Some(ColumnType::Long),
            DataType::Float32 => Some(ColumnType::Float),
            DataType::Float64 => Some(ColumnType::Double),
            DataType::Utf8 => Some(ColumnType::String),
            DataType::Boolean => Some(ColumnType::Boolean),
            DataType::Date32 => Some(ColumnType::Date),
            DataType::Timestamp(TimeUnit::Microsecond, None) => Some(ColumnType::Timestamp),
            _ => None,
        }
    }

    /// Returns true for integer and floating point types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Long | ColumnType::Float | ColumnType::Double
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = ExpectationError;

    fn from_str(s: &str) -> Result<Self> {
        ColumnType::parse(s)
    }
}

/// Conversion into a validated [`ColumnType`].
///
/// Implemented for `ColumnType` itself and for type names, so operations can
/// accept either and report unknown names as [`ExpectationError::InvalidType`].
pub trait IntoColumnType {
    /// Resolves the column type.
    fn into_column_type(self) -> Result<ColumnType>;
}

impl IntoColumnType for ColumnType {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(self)
    }
}

impl IntoColumnType for &str {
    fn into_column_type(self) -> Result<ColumnType> {
        ColumnType::parse(self)
    }
}

impl IntoColumnType for String {
    fn into_column_type(self) -> Result<ColumnType> {
        ColumnType::parse(&self)
    }
}

impl IntoColumnType for &String {
    fn into_column_type(self) -> Result<ColumnType> {
        ColumnType::parse(self)
    }
}

/// Name and declared type of a dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Declared column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    /// Creates a new column spec.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(ColumnType::parse("int").unwrap(), ColumnType::Integer);
        assert_eq!(ColumnType::parse("BIGINT").unwrap(), ColumnType::Long);
        assert_eq!(ColumnType::parse(" Double ").unwrap(), ColumnType::Double);
        assert_eq!(ColumnType::parse("varchar").unwrap(), ColumnType::String);
        assert_eq!(ColumnType::parse("bool").unwrap(), ColumnType::Boolean);
        assert_eq!(ColumnType::parse("date").unwrap(), ColumnType::Date);
        assert_eq!("timestamp".parse::<ColumnType>().unwrap(), ColumnType::Timestamp);
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = ColumnType::parse("decimal(10,2)").unwrap_err();
        assert!(matches!(err, ExpectationError::InvalidType(name) if name == "decimal(10,2)"));
    }

    #[test]
    fn test_data_type_mapping_is_reversible() {
        for column_type in ColumnType::ALL {
            let data_type = column_type.data_type();
            assert_eq!(ColumnType::from_data_type(&data_type), Some(column_type));
        }
        assert_eq!(ColumnType::from_data_type(&DataType::UInt8), None);
    }

    #[test]
    fn test_into_column_type() {
        assert_eq!("long".into_column_type().unwrap(), ColumnType::Long);
        assert_eq!(
            ColumnType::Date.into_column_type().unwrap(),
            ColumnType::Date
        );
        assert!("nope".to_string().into_column_type().is_err());
    }
}
