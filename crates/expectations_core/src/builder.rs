//! Builder pattern for creating expectation suites.
//!
//! This module provides an ergonomic builder for constructing suites with a
//! fluent API.

use crate::{DataValue, ExpectationConfig, ExpectationSuite, NamedExpectation};

/// Builder for creating an `ExpectationSuite`.
///
/// # Example
///
/// ```rust
/// use expectations_core::ExpectationSuiteBuilder;
///
/// let suite = ExpectationSuiteBuilder::new("orders")
///     .description("Daily orders extract")
///     .table_row_count("row_count", 1, 10_000)
///     .column_existence("has_id", "id")
///     .unique_column_values("unique_id", "id")
///     .build();
///
/// assert_eq!(suite.expectations.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ExpectationSuiteBuilder {
    name: String,
    description: Option<String>,
    expectations: Vec<NamedExpectation>,
}

impl ExpectationSuiteBuilder {
    /// Creates a new suite builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the suite description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an expectation.
    pub fn expectation(mut self, name: impl Into<String>, config: ExpectationConfig) -> Self {
        self.expectations.push(NamedExpectation {
            name: name.into(),
            config,
        });
        self
    }

    /// Adds a column count check.
    pub fn table_column_count(self, name: impl Into<String>, min: usize, max: usize) -> Self {
        self.expectation(name, ExpectationConfig::TableColumnCount { min, max })
    }

    /// Adds a row count check.
    pub fn table_row_count(self, name: impl Into<String>, min: usize, max: usize) -> Self {
        self.expectation(name, ExpectationConfig::TableRowCount { min, max })
    }

    /// Adds a column existence check.
    pub fn column_existence(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.expectation(
            name,
            ExpectationConfig::ColumnExistence {
                column: column.into(),
            },
        )
    }

    /// Adds an ordered column list check.
    pub fn ordered_column_list<S: Into<String>>(
        self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.expectation(
            name,
            ExpectationConfig::OrderedColumnList {
                columns: columns.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Adds a value range check.
    pub fn column_value_range(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        min: impl Into<DataValue>,
        max: impl Into<DataValue>,
    ) -> Self {
        self.expectation(
            name,
            ExpectationConfig::ColumnValueRange {
                column: column.into(),
                min: min.into(),
                max: max.into(),
            },
        )
    }

    /// Adds a min/max range check.
    pub fn column_min_max_range(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        min: impl Into<DataValue>,
        max: impl Into<DataValue>,
    ) -> Self {
        self.expectation(
            name,
            ExpectationConfig::ColumnMinMaxRange {
                column: column.into(),
                min: min.into(),
                max: max.into(),
            },
        )
    }

    /// Adds a uniqueness check.
    pub fn unique_column_values(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.expectation(
            name,
            ExpectationConfig::UniqueColumnValues {
                column: column.into(),
            },
        )
    }

    /// Builds the suite.
    pub fn build(self) -> ExpectationSuite {
        ExpectationSuite {
            name: self.name,
            description: self.description,
            expectations: self.expectations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_keeps_order() {
        let suite = ExpectationSuiteBuilder::new("people")
            .table_column_count("columns", 2, 2)
            .ordered_column_list("layout", ["id", "age"])
            .column_min_max_range("age_bounds", "age", 0, 120)
            .build();

        let names: Vec<&str> = suite.expectations.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["columns", "layout", "age_bounds"]);
        assert_eq!(suite.description, None);
        assert_eq!(
            suite.expectations[1].config,
            ExpectationConfig::OrderedColumnList {
                columns: vec!["id".to_string(), "age".to_string()],
            }
        );
    }
}
