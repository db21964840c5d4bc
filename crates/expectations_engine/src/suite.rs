//! Running expectation suites.

use crate::ValidationContext;
use expectations_core::{
    ExpectationConfig, ExpectationResult, ExpectationSuite, NamedExpectation, OutcomeMap, Result,
};
use tracing::{info, warn};

impl ValidationContext<'_> {
    /// Runs every expectation of a suite in order.
    ///
    /// Returns the outcome map and the detailed results in evaluation order.
    /// Min/max expectations record two outcomes, `<name>_min` and
    /// `<name>_max`. Structural errors abort the run; failed expectations are
    /// recorded as `false`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use expectations_core::{ColumnSpec, ColumnType, DataValue, ExpectationSuiteBuilder};
    /// use expectations_engine::{Session, ValidationContext};
    ///
    /// let session = Session::new();
    /// let dataset = session
    ///     .create_dataset(
    ///         vec![ColumnSpec::new("price", ColumnType::Double)],
    ///         vec![vec![DataValue::Float(9.5)], vec![DataValue::Float(120.0)]],
    ///     )
    ///     .unwrap();
    ///
    /// let suite = ExpectationSuiteBuilder::new("prices")
    ///     .column_min_max_range("price_bounds", "price", 0, 100)
    ///     .build();
    ///
    /// let (outcomes, _) = ValidationContext::wrap(&dataset).run_suite(&suite).unwrap();
    /// assert_eq!(outcomes.get("price_bounds_min"), Some(true));
    /// assert_eq!(outcomes.get("price_bounds_max"), Some(false));
    /// ```
    pub fn run_suite(
        &self,
        suite: &ExpectationSuite,
    ) -> Result<(OutcomeMap, Vec<ExpectationResult>)> {
        let mut outcomes = OutcomeMap::new();
        let mut results = Vec::with_capacity(suite.expectations.len());

        for expectation in &suite.expectations {
            let evaluated = self.evaluate(expectation)?;
            for (name, result) in expectation.outcome_names().into_iter().zip(evaluated) {
                if outcomes.record(name.as_str(), &result).is_some() {
                    warn!("Duplicate expectation name '{}', overwriting outcome", name);
                }
                results.push(result);
            }
        }

        info!(
            "Suite '{}' finished: {} passed, {} failed",
            suite.name,
            outcomes.passed_count(),
            outcomes.failed_count()
        );

        Ok((outcomes, results))
    }

    /// Evaluates one suite entry, producing one result per outcome name.
    fn evaluate(&self, expectation: &NamedExpectation) -> Result<Vec<ExpectationResult>> {
        let result = match &expectation.config {
            ExpectationConfig::TableColumnCount { min, max } => {
                self.expect_table_column_count(*min, *max)?
            }
            ExpectationConfig::TableRowCount { min, max } => self.expect_table_row_count(*min, *max)?,
            ExpectationConfig::ColumnExistence { column } => self.expect_column_existence(column),
            ExpectationConfig::OrderedColumnList { columns } => {
                self.expect_ordered_column_list(columns.as_slice())
            }
            ExpectationConfig::ColumnValueRange { column, min, max } => {
                self.expect_column_value_range(column, min.clone(), max.clone())?
            }
            ExpectationConfig::ColumnMinMaxRange { column, min, max } => {
                let (min_result, max_result) =
                    self.expect_column_min_max_range(column, min.clone(), max.clone())?;
                return Ok(vec![min_result, max_result]);
            }
            ExpectationConfig::UniqueColumnValues { column } => {
                self.expect_unique_column_values(column)?
            }
        };

        Ok(vec![result])
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dataset, Session, ValidationContext};
    use expectations_core::{
        ColumnSpec, ColumnType, DataValue, ExpectationError, ExpectationKind,
        ExpectationSuiteBuilder,
    };
    use pretty_assertions::assert_eq;

    fn orders() -> Dataset {
        Session::new()
            .create_dataset(
                vec![
                    ColumnSpec::new("order_id", ColumnType::Long),
                    ColumnSpec::new("amount", ColumnType::Double),
                ],
                vec![
                    vec![DataValue::Int(1), DataValue::Float(10.0)],
                    vec![DataValue::Int(2), DataValue::Float(250.0)],
                    vec![DataValue::Int(2), DataValue::Null],
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_run_suite_records_outcomes_in_order() {
        let suite = ExpectationSuiteBuilder::new("orders")
            .table_column_count("two_columns", 2, 2)
            .column_existence("has_amount", "amount")
            .ordered_column_list("column_order", ["order_id", "amount"])
            .unique_column_values("unique_order_id", "order_id")
            .column_min_max_range("amount_bounds", "amount", 0, 100)
            .build();

        let data = orders();
        let (outcomes, results) = ValidationContext::wrap(&data).run_suite(&suite).unwrap();

        let recorded: Vec<(&str, bool)> = outcomes.iter().collect();
        assert_eq!(
            recorded,
            vec![
                ("two_columns", true),
                ("has_amount", true),
                ("column_order", true),
                ("unique_order_id", false),
                ("amount_bounds_min", true),
                ("amount_bounds_max", false),
            ]
        );
        assert_eq!(results.len(), 6);
        assert_eq!(results[5].kind, ExpectationKind::ColumnMaxToBeBetween);
    }

    #[test]
    fn test_run_suite_propagates_structural_errors() {
        let suite = ExpectationSuiteBuilder::new("broken")
            .table_row_count("rows", 1, 10)
            .column_value_range("ghost_range", "ghost", 0, 1)
            .build();

        let data = orders();
        let err = ValidationContext::wrap(&data).run_suite(&suite).unwrap_err();
        assert!(matches!(err, ExpectationError::ColumnNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_run_suite_duplicate_name_overwrites() {
        let suite = ExpectationSuiteBuilder::new("dupes")
            .table_row_count("check", 1, 10)
            .column_existence("other", "order_id")
            .column_existence("check", "missing")
            .build();

        let data = orders();
        let (outcomes, results) = ValidationContext::wrap(&data).run_suite(&suite).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes.iter().next(), Some(("check", false)));
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_run_empty_suite() {
        let data = orders();
        let (outcomes, results) = ValidationContext::wrap(&data)
            .run_suite(&ExpectationSuiteBuilder::new("empty").build())
            .unwrap();
        assert!(outcomes.is_empty());
        assert!(results.is_empty());
    }
}
