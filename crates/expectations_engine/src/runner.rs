//! Expectation evaluation.
//!
//! A [`ValidationContext`] borrows one dataset and exposes the supported
//! checks. Checks only read the dataset. A failed expectation is returned as
//! a result with `success = false`; errors are reserved for contract
//! violations such as unknown columns or inverted ranges.
//!
//! Null policy:
//! - value range, min and max checks skip nulls (counted as `missing_count`)
//! - uniqueness ignores nulls, so repeated nulls never violate it
//!
//! NaN policy: NaN sorts above every other number and equals itself. A NaN
//! value therefore becomes the column max, never the min (unless every value
//! is NaN), and only satisfies a range whose upper bound is open.
//!
//! A `Null` bound leaves that side of a range open.

use crate::Dataset;
use chrono::{NaiveDate, NaiveDateTime};
use expectations_core::{
    ColumnType, DataValue, ExpectationError, ExpectationKind, ExpectationResult, Result,
    UnexpectedDetails, PARTIAL_UNEXPECTED_LIMIT,
};
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Binds a dataset to the expectation operations.
///
/// # Example
///
/// ```rust
/// use expectations_core::{ColumnSpec, ColumnType, DataValue};
/// use expectations_engine::{Session, ValidationContext};
///
/// let session = Session::new();
/// let dataset = session
///     .create_dataset(
///         vec![ColumnSpec::new("id", ColumnType::Long)],
///         vec![vec![DataValue::Int(1)], vec![DataValue::Int(2)]],
///     )
///     .unwrap();
///
/// let ctx = ValidationContext::wrap(&dataset);
/// assert!(ctx.expect_table_row_count(1, 10).unwrap().success);
/// assert!(ctx.expect_unique_column_values("id").unwrap().success);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    dataset: &'a Dataset,
}

impl<'a> ValidationContext<'a> {
    /// Wraps a dataset for validation.
    pub fn wrap(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Returns the wrapped dataset.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Expects the number of columns to lie within `[min, max]`.
    pub fn expect_table_column_count(&self, min: usize, max: usize) -> Result<ExpectationResult> {
        check_count_range(min, max)?;
        let observed = self.dataset.column_count();

        Ok(logged(
            ExpectationResult::new(
                ExpectationKind::TableColumnCountToBeBetween,
                (min..=max).contains(&observed),
            )
            .with_parameter("min_value", min)
            .with_parameter("max_value", max)
            .with_observed(observed),
        ))
    }

    /// Expects the number of rows to lie within `[min, max]`.
    pub fn expect_table_row_count(&self, min: usize, max: usize) -> Result<ExpectationResult> {
        check_count_range(min, max)?;
        let observed = self.dataset.row_count();

        Ok(logged(
            ExpectationResult::new(
                ExpectationKind::TableRowCountToBeBetween,
                (min..=max).contains(&observed),
            )
            .with_parameter("min_value", min)
            .with_parameter("max_value", max)
            .with_observed(observed),
        ))
    }

    /// Expects a column to exist.
    pub fn expect_column_existence(&self, column: &str) -> ExpectationResult {
        logged(
            ExpectationResult::new(
                ExpectationKind::ColumnToExist,
                self.dataset.has_column(column),
            )
            .with_column(column)
            .with_parameter("column", column),
        )
    }

    /// Expects the column names, in order, to equal `columns` exactly.
    ///
    /// Mismatching positions are listed in the result details.
    pub fn expect_ordered_column_list<S: AsRef<str>>(&self, columns: &[S]) -> ExpectationResult {
        let expected: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        let actual = self.dataset.column_names();

        let positions = expected.len().max(actual.len());
        let mismatched: Vec<Value> = (0..positions)
            .filter_map(|idx| {
                let want = expected.get(idx).copied();
                let found = actual.get(idx).map(String::as_str);
                (want != found).then(|| {
                    json!({
                        "expected_column_position": idx,
                        "expected": want,
                        "found": found,
                    })
                })
            })
            .collect();

        let details = UnexpectedDetails::new(positions, 0, mismatched.len(), mismatched);

        logged(
            ExpectationResult::new(
                ExpectationKind::TableColumnsToMatchOrderedList,
                details.unexpected_count == 0,
            )
            .with_parameter("column_list", expected)
            .with_observed(actual)
            .with_details(details),
        )
    }

    /// Expects every non-null value of `column` to lie within `[min, max]`.
    pub fn expect_column_value_range(
        &self,
        column: &str,
        min: impl Into<DataValue>,
        max: impl Into<DataValue>,
    ) -> Result<ExpectationResult> {
        let (min, max) = self.resolve_bounds(column, min.into(), max.into())?;
        let values = self.dataset.column_values(column)?;

        let mut missing = 0;
        let mut unexpected = 0;
        let mut partial = Vec::new();
        for value in &values {
            if value.is_null() {
                missing += 1;
            } else if !within(value, &min, &max) {
                unexpected += 1;
                if partial.len() < PARTIAL_UNEXPECTED_LIMIT {
                    partial.push(value.to_json());
                }
            }
        }

        Ok(logged(
            ExpectationResult::new(ExpectationKind::ColumnValuesToBeBetween, unexpected == 0)
                .with_column(column)
                .with_parameter("column", column)
                .with_parameter("min_value", min.to_json())
                .with_parameter("max_value", max.to_json())
                .with_details(UnexpectedDetails::new(values.len(), missing, unexpected, partial)),
        ))
    }

    /// Expects the smallest non-null value of `column` to lie within `[min, max]`.
    ///
    /// A column without non-null values fails with a `null` observed value.
    pub fn expect_column_min_to_be_between(
        &self,
        column: &str,
        min: impl Into<DataValue>,
        max: impl Into<DataValue>,
    ) -> Result<ExpectationResult> {
        self.expect_extreme(
            ExpectationKind::ColumnMinToBeBetween,
            Ordering::Less,
            column,
            min.into(),
            max.into(),
        )
    }

    /// Expects the largest non-null value of `column` to lie within `[min, max]`.
    ///
    /// A column without non-null values fails with a `null` observed value.
    pub fn expect_column_max_to_be_between(
        &self,
        column: &str,
        min: impl Into<DataValue>,
        max: impl Into<DataValue>,
    ) -> Result<ExpectationResult> {
        self.expect_extreme(
            ExpectationKind::ColumnMaxToBeBetween,
            Ordering::Greater,
            column,
            min.into(),
            max.into(),
        )
    }

    /// Evaluates the min check and the max check of `column` independently.
    ///
    /// Returns `(min_result, max_result)`.
    pub fn expect_column_min_max_range(
        &self,
        column: &str,
        min: impl Into<DataValue>,
        max: impl Into<DataValue>,
    ) -> Result<(ExpectationResult, ExpectationResult)> {
        let (min, max) = (min.into(), max.into());
        let min_result = self.expect_column_min_to_be_between(column, min.clone(), max.clone())?;
        let max_result = self.expect_column_max_to_be_between(column, min, max)?;
        Ok((min_result, max_result))
    }

    /// Expects no non-null value of `column` to appear more than once.
    ///
    /// Every row holding a repeated value counts as unexpected.
    pub fn expect_unique_column_values(&self, column: &str) -> Result<ExpectationResult> {
        let values = self.dataset.column_values(column)?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values.iter().filter(|v| !v.is_null()) {
            *counts.entry(value.grouping_key()).or_default() += 1;
        }

        let mut missing = 0;
        let mut unexpected = 0;
        let mut partial = Vec::new();
        for value in &values {
            if value.is_null() {
                missing += 1;
            } else if counts.get(&value.grouping_key()).copied().unwrap_or_default() > 1 {
                unexpected += 1;
                if partial.len() < PARTIAL_UNEXPECTED_LIMIT {
                    partial.push(value.to_json());
                }
            }
        }

        Ok(logged(
            ExpectationResult::new(ExpectationKind::ColumnValuesToBeUnique, unexpected == 0)
                .with_column(column)
                .with_parameter("column", column)
                .with_details(UnexpectedDetails::new(values.len(), missing, unexpected, partial)),
        ))
    }

    fn expect_extreme(
        &self,
        kind: ExpectationKind,
        direction: Ordering,
        column: &str,
        min: DataValue,
        max: DataValue,
    ) -> Result<ExpectationResult> {
        let (min, max) = self.resolve_bounds(column, min, max)?;
        let values = self.dataset.column_values(column)?;

        let observed = values
            .into_iter()
            .filter(|value| !value.is_null())
            .fold(None::<DataValue>, |best, value| match best {
                Some(current) if order(&value, &current) != Some(direction) => Some(current),
                _ => Some(value),
            });

        let success = observed
            .as_ref()
            .is_some_and(|value| within(value, &min, &max));

        Ok(logged(
            ExpectationResult::new(kind, success)
                .with_column(column)
                .with_parameter("column", column)
                .with_parameter("min_value", min.to_json())
                .with_parameter("max_value", max.to_json())
                .with_observed(observed.map(|v| v.to_json()).unwrap_or(Value::Null)),
        ))
    }

    /// Coerces both bounds to the column's type and rejects inverted ranges.
    fn resolve_bounds(
        &self,
        column: &str,
        min: DataValue,
        max: DataValue,
    ) -> Result<(DataValue, DataValue)> {
        let column_type = self.dataset.column_type(column)?;
        let min = coerce_bound(column, column_type, min)?;
        let max = coerce_bound(column, column_type, max)?;

        if min.compare(&max) == Some(Ordering::Greater) {
            return Err(ExpectationError::range(&min, &max));
        }
        Ok((min, max))
    }
}

fn check_count_range(min: usize, max: usize) -> Result<()> {
    if min > max {
        return Err(ExpectationError::range(min, max));
    }
    Ok(())
}

fn logged(result: ExpectationResult) -> ExpectationResult {
    debug!(
        expectation = %result.kind,
        column = result.column.as_deref().unwrap_or("-"),
        success = result.success,
        "Evaluated expectation"
    );
    result
}

fn is_nan(value: &DataValue) -> bool {
    matches!(value, DataValue::Float(f) if f.is_nan())
}

/// Total order over numbers with NaN above every other value.
fn order(a: &DataValue, b: &DataValue) -> Option<Ordering> {
    match (is_nan(a), is_nan(b)) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => b.as_float().map(|_| Ordering::Greater),
        (false, true) => a.as_float().map(|_| Ordering::Less),
        (false, false) => a.compare(b),
    }
}

/// Inclusive range membership. `Null` bounds are open; incomparable values
/// are outside.
fn within(value: &DataValue, min: &DataValue, max: &DataValue) -> bool {
    let above_min =
        min.is_null() || matches!(order(value, min), Some(Ordering::Greater | Ordering::Equal));
    let below_max =
        max.is_null() || matches!(order(value, max), Some(Ordering::Less | Ordering::Equal));
    above_min && below_max
}

/// Makes a bound comparable with the values of a column.
///
/// Date and timestamp columns accept ISO-8601 strings as bounds. String
/// columns accept date and timestamp bounds, compared as ISO-8601 text, since
/// suite files read date-shaped strings as dates.
fn coerce_bound(column: &str, column_type: ColumnType, bound: DataValue) -> Result<DataValue> {
    let mismatch = |bound: &DataValue| {
        ExpectationError::type_mismatch(column, column_type.name(), bound.type_name())
    };

    let coerced = match (column_type, bound) {
        (_, DataValue::Null) => DataValue::Null,
        (t, bound @ (DataValue::Int(_) | DataValue::Float(_))) if t.is_numeric() => bound,
        (ColumnType::String, bound @ DataValue::String(_)) => bound,
        (ColumnType::String, DataValue::Date(d)) => {
            DataValue::String(d.format("%Y-%m-%d").to_string())
        }
        (ColumnType::String, DataValue::Timestamp(ts)) => {
            DataValue::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
        (ColumnType::Boolean, bound @ DataValue::Bool(_)) => bound,
        (
            ColumnType::Date | ColumnType::Timestamp,
            bound @ (DataValue::Date(_) | DataValue::Timestamp(_)),
        ) => bound,
        (ColumnType::Date, DataValue::String(s)) => {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(DataValue::Date)
                .map_err(|_| mismatch(&DataValue::String(s)))?
        }
        (ColumnType::Timestamp, DataValue::String(s)) => parse_timestamp(&s)
            .map(DataValue::Timestamp)
            .ok_or_else(|| mismatch(&DataValue::String(s)))?,
        (_, bound) => return Err(mismatch(&bound)),
    };

    Ok(coerced)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
