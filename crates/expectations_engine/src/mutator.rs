//! Column-level schema mutation.
//!
//! Both operations leave the input dataset untouched and return a new one.
//! Target types are validated before any data is read.

use crate::{Dataset, convert};
use arrow_array::UInt32Array;
use expectations_core::{DataValue, IntoColumnType, Result};
use tracing::debug;

/// Adds a column holding the same literal on every row.
///
/// The literal is cast to `column_type`; a literal that cannot be represented
/// fails with `ValueCast`, and an unknown type name with `InvalidType`. A
/// `Null` literal produces an all-null column. If `name` already exists its
/// values are overwritten in place, otherwise the column is appended.
///
/// # Example
///
/// ```rust
/// use expectations_core::{ColumnSpec, ColumnType, DataValue};
/// use expectations_engine::{Session, add_column};
///
/// let session = Session::new();
/// let dataset = session
///     .create_dataset(
///         vec![ColumnSpec::new("id", ColumnType::Long)],
///         vec![vec![DataValue::Int(1)], vec![DataValue::Int(2)]],
///     )
///     .unwrap();
///
/// let with_source = add_column(&dataset, "source", "crm", "string").unwrap();
/// assert_eq!(with_source.column_names(), vec!["id", "source"]);
/// ```
pub fn add_column(
    dataset: &Dataset,
    name: &str,
    value: impl Into<DataValue>,
    column_type: impl IntoColumnType,
) -> Result<Dataset> {
    let column_type = column_type.into_column_type()?;
    let value = value.into();

    let literal = convert::cast_value(&value, column_type, name)?;
    let indices = UInt32Array::from(vec![0u32; dataset.row_count()]);
    let column = arrow_select::take::take(literal.as_ref(), &indices, None)?;

    debug!(
        column = name,
        column_type = %column_type,
        replaced = dataset.has_column(name),
        rows = dataset.row_count(),
        "Adding literal column"
    );

    dataset.with_column(name, column_type, column)
}

/// Casts an existing column to a new type.
///
/// Fails with `ColumnNotFound` if the column is absent and with `ValueCast`
/// if any non-null value cannot be converted. Failed conversions are never
/// turned into nulls. Existing nulls stay null.
pub fn cast_column(
    dataset: &Dataset,
    name: &str,
    column_type: impl IntoColumnType,
) -> Result<Dataset> {
    let column_type = column_type.into_column_type()?;
    let column = dataset.column(name)?;

    let casted = convert::cast_array(column, column_type, name)?;

    debug!(
        column = name,
        from = %column.data_type(),
        to = %column_type,
        "Casting column"
    );

    dataset.with_column(name, column_type, casted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Session;
    use expectations_core::{ColumnSpec, ColumnType, ExpectationError};
    use pretty_assertions::assert_eq;

    fn scores() -> Dataset {
        Session::new()
            .create_dataset(
                vec![
                    ColumnSpec::new("id", ColumnType::Long),
                    ColumnSpec::new("score", ColumnType::String),
                ],
                vec![
                    vec![DataValue::Int(1), DataValue::from("10")],
                    vec![DataValue::Int(2), DataValue::Null],
                    vec![DataValue::Int(3), DataValue::from("30")],
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_add_column_appends_literal() {
        let dataset = scores();
        let result = add_column(&dataset, "active", true, ColumnType::Boolean).unwrap();

        assert_eq!(result.column_count(), dataset.column_count() + 1);
        assert_eq!(result.row_count(), dataset.row_count());
        assert_eq!(
            result.column_values("active").unwrap(),
            vec![DataValue::Bool(true); 3]
        );
    }

    #[test]
    fn test_add_column_casts_literal() {
        let result = add_column(&scores(), "batch", "7", "int").unwrap();
        assert_eq!(result.column_type("batch").unwrap(), ColumnType::Integer);
        assert_eq!(result.column_values("batch").unwrap(), vec![DataValue::Int(7); 3]);
    }

    #[test]
    fn test_add_column_overwrites_existing() {
        let dataset = scores();
        let result = add_column(&dataset, "score", 0, "long").unwrap();

        assert_eq!(result.column_count(), dataset.column_count());
        assert_eq!(result.column_names(), vec!["id", "score"]);
        assert_eq!(result.column_values("score").unwrap(), vec![DataValue::Int(0); 3]);
    }

    #[test]
    fn test_add_column_null_literal() {
        let result = add_column(&scores(), "note", DataValue::Null, "string").unwrap();
        assert_eq!(result.column_values("note").unwrap(), vec![DataValue::Null; 3]);
    }

    #[test]
    fn test_add_column_to_empty_dataset() {
        let dataset = Session::new()
            .create_dataset(vec![ColumnSpec::new("id", ColumnType::Long)], vec![])
            .unwrap();
        let result = add_column(&dataset, "flag", false, "boolean").unwrap();
        assert_eq!(result.column_count(), 2);
        assert_eq!(result.row_count(), 0);
    }

    #[test]
    fn test_add_column_invalid_type() {
        let err = add_column(&scores(), "x", 1, "uuid").unwrap_err();
        assert!(matches!(err, ExpectationError::InvalidType(name) if name == "uuid"));
    }

    #[test]
    fn test_add_column_uncastable_value() {
        let err = add_column(&scores(), "x", "not a date", "date").unwrap_err();
        assert!(matches!(err, ExpectationError::ValueCast { column, .. } if column == "x"));
    }

    #[test]
    fn test_cast_column_converts_values() {
        let result = cast_column(&scores(), "score", ColumnType::Double).unwrap();
        assert_eq!(result.column_type("score").unwrap(), ColumnType::Double);
        assert_eq!(
            result.column_values("score").unwrap(),
            vec![DataValue::Float(10.0), DataValue::Null, DataValue::Float(30.0)]
        );
        assert_eq!(result.row_count(), 3);
    }

    #[test]
    fn test_cast_column_to_same_type_keeps_values() {
        let dataset = scores();
        let result = cast_column(&dataset, "id", "bigint").unwrap();
        assert_eq!(result.rows().unwrap(), dataset.rows().unwrap());
    }

    #[test]
    fn test_cast_column_missing() {
        let err = cast_column(&scores(), "missing", "string").unwrap_err();
        assert!(matches!(err, ExpectationError::ColumnNotFound(_)));
    }

    #[test]
    fn test_cast_column_raises_on_bad_value() {
        let dataset = add_column(&scores(), "code", "A1", "string").unwrap();
        let err = cast_column(&dataset, "code", "integer").unwrap_err();
        assert!(matches!(err, ExpectationError::ValueCast { target, .. } if target == "integer"));
    }

    #[test]
    fn test_add_column_float_overflow() {
        let err = add_column(&scores(), "ratio", 1e300, "float").unwrap_err();
        assert!(matches!(err, ExpectationError::ValueCast { column, .. } if column == "ratio"));
    }

    #[test]
    fn test_cast_column_double_to_float_overflow() {
        let dataset = add_column(&scores(), "big", 1e300, ColumnType::Double).unwrap();
        let err = cast_column(&dataset, "big", ColumnType::Float).unwrap_err();
        assert!(matches!(err, ExpectationError::ValueCast { target, .. } if target == "float"));

        let small = add_column(&scores(), "small", 2.5, ColumnType::Double).unwrap();
        let casted = cast_column(&small, "small", ColumnType::Float).unwrap();
        assert_eq!(casted.column_values("small").unwrap(), vec![DataValue::Float(2.5); 3]);
    }

    #[test]
    fn test_cast_column_unsupported_conversion() {
        let dataset = add_column(&scores(), "flag", true, "boolean").unwrap();
        let err = cast_column(&dataset, "flag", "date").unwrap_err();
        assert!(matches!(err, ExpectationError::ValueCast { .. }));
    }
}
