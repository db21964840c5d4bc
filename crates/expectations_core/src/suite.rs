//! Expectation suite definitions.
//!
//! A suite is an ordered list of named expectations that can be declared in
//! code or loaded from YAML/TOML and then run against a dataset in one pass.

use crate::DataValue;
use serde::{Deserialize, Serialize};

/// An ordered collection of named expectations.
///
/// # Example
///
/// ```rust
/// use expectations_core::{ExpectationConfig, ExpectationSuite, NamedExpectation};
///
/// let suite = ExpectationSuite {
///     name: "orders".to_string(),
///     description: Some("Daily orders extract".to_string()),
///     expectations: vec![NamedExpectation {
///         name: "has_rows".to_string(),
///         config: ExpectationConfig::TableRowCount { min: 1, max: 1_000_000 },
///     }],
/// };
/// assert_eq!(suite.expectations.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    /// Suite name
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Expectations, evaluated in order
    #[serde(default)]
    pub expectations: Vec<NamedExpectation>,
}

/// An expectation with the name its outcome is reported under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedExpectation {
    /// Outcome name
    pub name: String,

    /// Check to run
    #[serde(flatten)]
    pub config: ExpectationConfig,
}

impl NamedExpectation {
    /// Names this expectation's outcomes are recorded under.
    ///
    /// Min/max checks produce two outcomes, `<name>_min` and `<name>_max`.
    pub fn outcome_names(&self) -> Vec<String> {
        match self.config {
            ExpectationConfig::ColumnMinMaxRange { .. } => {
                vec![format!("{}_min", self.name), format!("{}_max", self.name)]
            }
            _ => vec![self.name.clone()],
        }
    }
}

/// Declarative form of each supported check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpectationConfig {
    /// Column count within `[min, max]`
    TableColumnCount {
        /// Minimum column count (inclusive)
        min: usize,
        /// Maximum column count (inclusive)
        max: usize,
    },

    /// Row count within `[min, max]`
    TableRowCount {
        /// Minimum row count (inclusive)
        min: usize,
        /// Maximum row count (inclusive)
        max: usize,
    },

    /// Column present
    ColumnExistence {
        /// Column name
        column: String,
    },

    /// Column names equal `columns`, in order
    OrderedColumnList {
        /// Expected column names
        columns: Vec<String>,
    },

    /// Every non-null value within `[min, max]`
    ColumnValueRange {
        /// Column name
        column: String,
        /// Lower bound (inclusive)
        min: DataValue,
        /// Upper bound (inclusive)
        max: DataValue,
    },

    /// Observed min and max each within `[min, max]`; reported as two outcomes
    ColumnMinMaxRange {
        /// Column name
        column: String,
        /// Lower bound (inclusive)
        min: DataValue,
        /// Upper bound (inclusive)
        max: DataValue,
    },

    /// No non-null value repeated
    UniqueColumnValues {
        /// Column name
        column: String,
    },
}

impl ExpectationConfig {
    /// Column targeted by this check, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            ExpectationConfig::ColumnExistence { column }
            | ExpectationConfig::ColumnValueRange { column, .. }
            | ExpectationConfig::ColumnMinMaxRange { column, .. }
            | ExpectationConfig::UniqueColumnValues { column } => Some(column),
            ExpectationConfig::TableColumnCount { .. }
            | ExpectationConfig::TableRowCount { .. }
            | ExpectationConfig::OrderedColumnList { .. } => None,
        }
    }
}
