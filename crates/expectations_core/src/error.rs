//! Error types for dataset expectations.
//!
//! Only structural or contract violations are errors. An expectation that
//! evaluates to `success = false` is a regular result, never an error.

use arrow_schema::ArrowError;
use thiserror::Error;

/// Result type for expectation operations.
pub type Result<T> = std::result::Result<T, ExpectationError>;

/// Main error type for dataset mutation, expectation evaluation and reporting.
#[derive(Error, Debug)]
pub enum ExpectationError {
    /// Type name is not part of the supported primitive types
    #[error("Invalid column type: '{0}'")]
    InvalidType(String),

    /// A value could not be represented in the requested type
    #[error("Cannot cast column '{column}' to {target}: {reason}")]
    ValueCast {
        /// Column being written or cast
        column: String,
        /// Target type name
        target: String,
        /// Underlying conversion failure
        reason: String,
    },

    /// Column does not exist in the dataset
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Caller supplied a range whose lower bound exceeds its upper bound
    #[error("Invalid range: min {min} is greater than max {max}")]
    Range {
        /// Lower bound as supplied
        min: String,
        /// Upper bound as supplied
        max: String,
    },

    /// A report was required to contain at least one row
    #[error("Cannot build a report from an empty outcome map")]
    EmptyReport,

    /// A bound cannot be compared with the values of a column
    #[error("Type mismatch for column '{column}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// Column name
        column: String,
        /// Type of the column
        expected: String,
        /// Type of the offending value
        actual: String,
    },

    /// Rows and columns disagree on their dimensions
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// Arrow rejected a batch or array operation
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// The query engine failed
    #[error("Engine error: {0}")]
    Engine(String),
}

impl ExpectationError {
    /// Creates a new invalid type error.
    pub fn invalid_type(type_name: impl Into<String>) -> Self {
        Self::InvalidType(type_name.into())
    }

    /// Creates a new value cast error.
    pub fn value_cast(
        column: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ValueCast {
            column: column.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound(column.into())
    }

    /// Creates a new range error.
    pub fn range(min: impl ToString, max: impl ToString) -> Self {
        Self::Range {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a new shape error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    /// Wraps an engine failure.
    pub fn engine(error: impl std::fmt::Display) -> Self {
        Self::Engine(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExpectationError::range(10, 2);
        assert_eq!(err.to_string(), "Invalid range: min 10 is greater than max 2");

        let err = ExpectationError::value_cast("age", "integer", "invalid digit");
        assert_eq!(
            err.to_string(),
            "Cannot cast column 'age' to integer: invalid digit"
        );

        let err = ExpectationError::column_not_found("missing");
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_arrow_error_conversion() {
        let err: ExpectationError = ArrowError::ComputeError("boom".to_string()).into();
        assert!(matches!(err, ExpectationError::Arrow(_)));
    }
}
