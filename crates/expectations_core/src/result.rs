//! Expectation results and outcome collection.
//!
//! Every check produces an [`ExpectationResult`]: a required success flag plus
//! diagnostics that are passed through untouched. Callers collect the flags
//! they care about into an [`OutcomeMap`] for reporting.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Maximum number of unexpected values listed in [`UnexpectedDetails`].
pub const PARTIAL_UNEXPECTED_LIMIT: usize = 20;

/// The kind of check that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpectationKind {
    /// Column count within a range
    #[serde(rename = "expect_table_column_count_to_be_between")]
    TableColumnCountToBeBetween,
    /// Row count within a range
    #[serde(rename = "expect_table_row_count_to_be_between")]
    TableRowCountToBeBetween,
    /// Column present
    #[serde(rename = "expect_column_to_exist")]
    ColumnToExist,
    /// Column names equal an ordered list
    #[serde(rename = "expect_table_columns_to_match_ordered_list")]
    TableColumnsToMatchOrderedList,
    /// Every non-null value within a range
    #[serde(rename = "expect_column_values_to_be_between")]
    ColumnValuesToBeBetween,
    /// Observed minimum within a range
    #[serde(rename = "expect_column_min_to_be_between")]
    ColumnMinToBeBetween,
    /// Observed maximum within a range
    #[serde(rename = "expect_column_max_to_be_between")]
    ColumnMaxToBeBetween,
    /// No non-null value repeated
    #[serde(rename = "expect_column_values_to_be_unique")]
    ColumnValuesToBeUnique,
}

impl ExpectationKind {
    /// Returns the canonical expectation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectationKind::TableColumnCountToBeBetween => {
                "expect_table_column_count_to_be_between"
            }
            ExpectationKind::TableRowCountToBeBetween => "expect_table_row_count_to_be_between",
            ExpectationKind::ColumnToExist => "expect_column_to_exist",
            ExpectationKind::TableColumnsToMatchOrderedList => {
                "expect_table_columns_to_match_ordered_list"
            }
            ExpectationKind::ColumnValuesToBeBetween => "expect_column_values_to_be_between",
            ExpectationKind::ColumnMinToBeBetween => "expect_column_min_to_be_between",
            ExpectationKind::ColumnMaxToBeBetween => "expect_column_max_to_be_between",
            ExpectationKind::ColumnValuesToBeUnique => "expect_column_values_to_be_unique",
        }
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-value statistics for column map checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnexpectedDetails {
    /// Rows in the column
    pub element_count: usize,

    /// Null rows (excluded from evaluation)
    pub missing_count: usize,

    /// Non-null rows that violated the check
    pub unexpected_count: usize,

    /// `unexpected_count` as a percentage of non-null rows
    pub unexpected_percent: f64,

    /// First offending values, at most [`PARTIAL_UNEXPECTED_LIMIT`]
    pub partial_unexpected_list: Vec<Value>,
}

impl UnexpectedDetails {
    /// Builds details from counts and the offending values seen so far.
    pub fn new(
        element_count: usize,
        missing_count: usize,
        unexpected_count: usize,
        mut partial_unexpected_list: Vec<Value>,
    ) -> Self {
        let evaluated = element_count.saturating_sub(missing_count);
        let unexpected_percent = if evaluated == 0 {
            0.0
        } else {
            unexpected_count as f64 / evaluated as f64 * 100.0
        };
        partial_unexpected_list.truncate(PARTIAL_UNEXPECTED_LIMIT);

        Self {
            element_count,
            missing_count,
            unexpected_count,
            unexpected_percent,
            partial_unexpected_list,
        }
    }
}

/// Outcome of a single expectation.
///
/// Only `success` is interpreted by this crate. The remaining fields are
/// diagnostics for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// Whether the expectation held
    pub success: bool,

    /// Which check produced this result
    pub kind: ExpectationKind,

    /// Column the check targeted, for column-level checks
    pub column: Option<String>,

    /// Arguments the check was called with
    pub parameters: Map<String, Value>,

    /// Value observed on the dataset (count, min, max, column list, ...)
    pub observed_value: Value,

    /// Per-value statistics for column map checks
    pub details: Option<UnexpectedDetails>,
}

impl ExpectationResult {
    /// Creates a result with no diagnostics.
    pub fn new(kind: ExpectationKind, success: bool) -> Self {
        Self {
            success,
            kind,
            column: None,
            parameters: Map::new(),
            observed_value: Value::Null,
            details: None,
        }
    }

    /// Sets the target column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Records a call parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Sets the observed value.
    pub fn with_observed(mut self, observed: impl Into<Value>) -> Self {
        self.observed_value = observed.into();
        self
    }

    /// Attaches per-value statistics.
    pub fn with_details(mut self, details: UnexpectedDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// Insertion-ordered mapping from expectation name to success flag.
///
/// Keys are unique. Inserting an existing name replaces its flag but keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeMap {
    entries: Vec<(String, bool)>,
}

impl OutcomeMap {
    /// Creates an empty outcome map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an outcome, returning the previous flag if any.
    pub fn insert(&mut self, name: impl Into<String>, success: bool) -> Option<bool> {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, success)),
            None => {
                self.entries.push((name, success));
                None
            }
        }
    }

    /// Records the success flag of a result under `name`.
    pub fn record(&mut self, name: impl Into<String>, result: &ExpectationResult) -> Option<bool> {
        self.insert(name, result.success)
    }

    /// Looks up an outcome by name.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, success)| *success)
    }

    /// Returns the number of outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no outcome has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over outcomes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(name, success)| (name.as_str(), *success))
    }

    /// Number of passed expectations.
    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|(_, success)| *success).count()
    }

    /// Number of failed expectations.
    pub fn failed_count(&self) -> usize {
        self.len() - self.passed_count()
    }

    /// Returns true if every recorded expectation passed.
    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(|(_, success)| *success)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for OutcomeMap {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        let mut map = OutcomeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>> Extend<(K, bool)> for OutcomeMap {
    fn extend<T: IntoIterator<Item = (K, bool)>>(&mut self, iter: T) {
        for (name, success) in iter {
            self.insert(name, success);
        }
    }
}
