//! Conversion between Arrow arrays and `DataValue`s.

use arrow_array::array::*;
use arrow_array::{ArrayRef, new_empty_array, new_null_array};
use arrow_cast::cast::{CastOptions, can_cast_types, cast_with_options};
use arrow_schema::DataType;
use chrono::NaiveDate;
use expectations_core::{ColumnType, DataValue, ExpectationError, Result};
use std::sync::Arc;

/// Values that cannot be converted raise instead of becoming null.
pub(crate) fn checked() -> CastOptions<'static> {
    CastOptions {
        safe: false,
        ..Default::default()
    }
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Builds a one-element array holding `value` in its natural Arrow type.
pub(crate) fn value_to_array(value: &DataValue) -> ArrayRef {
    match value {
        DataValue::Null => new_null_array(&DataType::Null, 1),
        DataValue::Bool(b) => Arc::new(BooleanArray::from(vec![*b])),
        DataValue::Int(i) => Arc::new(Int64Array::from(vec![*i])),
        DataValue::Float(f) => Arc::new(Float64Array::from(vec![*f])),
        DataValue::Date(d) => {
            let days = d.signed_duration_since(unix_epoch()).num_days() as i32;
            Arc::new(Date32Array::from(vec![days]))
        }
        DataValue::Timestamp(ts) => Arc::new(TimestampMicrosecondArray::from(vec![
            ts.and_utc().timestamp_micros(),
        ])),
        DataValue::String(s) => Arc::new(StringArray::from(vec![s.as_str()])),
    }
}

/// Casts an array to `target`, failing on any value that does not convert.
pub(crate) fn cast_array(array: &ArrayRef, target: ColumnType, column: &str) -> Result<ArrayRef> {
    let data_type = target.data_type();
    if !can_cast_types(array.data_type(), &data_type) {
        return Err(ExpectationError::value_cast(
            column,
            target.name(),
            format!("unsupported conversion from {}", array.data_type()),
        ));
    }

    let casted = cast_with_options(array, &data_type, &checked())
        .map_err(|e| ExpectationError::value_cast(column, target.name(), e.to_string()))?;

    if target == ColumnType::Float {
        check_float_range(array, &casted, column)?;
    }
    Ok(casted)
}

/// Narrowing to 32-bit floats saturates to infinity instead of failing.
fn check_float_range(source: &ArrayRef, casted: &ArrayRef, column: &str) -> Result<()> {
    if source.data_type() == &DataType::Float32 {
        return Ok(());
    }

    let wide = cast_with_options(source, &DataType::Float64, &checked())
        .map_err(|e| ExpectationError::value_cast(column, ColumnType::Float.name(), e.to_string()))?;
    let wide = downcast::<Float64Array>(&wide, "Float64Array")?;
    let narrow = downcast::<Float32Array>(casted, "Float32Array")?;

    let overflow = wide
        .iter()
        .zip(narrow.iter())
        .find_map(|pair| match pair {
            (Some(w), Some(n)) if w.is_finite() && n.is_infinite() => Some(w),
            _ => None,
        });

    match overflow {
        Some(value) => Err(ExpectationError::value_cast(
            column,
            ColumnType::Float.name(),
            format!("{value} is out of range for float"),
        )),
        None => Ok(()),
    }
}

/// Casts a single literal to `target`, returning a one-element array.
pub(crate) fn cast_value(value: &DataValue, target: ColumnType, column: &str) -> Result<ArrayRef> {
    cast_array(&value_to_array(value), target, column)
}

/// Builds a column of type `target` from literal values.
pub(crate) fn values_to_array(
    values: &[DataValue],
    target: ColumnType,
    column: &str,
) -> Result<ArrayRef> {
    if values.is_empty() {
        return Ok(new_empty_array(&target.data_type()));
    }

    if let Some(natural) = uniform_array(values) {
        return cast_array(&natural, target, column);
    }

    // mixed kinds, e.g. ints and strings in one column
    let cells = values
        .iter()
        .map(|value| cast_value(value, target, column))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&dyn Array> = cells.iter().map(|cell| cell.as_ref()).collect();

    Ok(arrow_select::concat::concat(&refs)?)
}

/// Builds one array in the natural type of `values` when every non-null
/// value is of the same kind.
fn uniform_array(values: &[DataValue]) -> Option<ArrayRef> {
    let first = values.iter().find(|value| !value.is_null());
    let same_kind = |value: &DataValue| {
        value.is_null()
            || first.is_some_and(|f| std::mem::discriminant(f) == std::mem::discriminant(value))
    };
    if !values.iter().all(same_kind) {
        return None;
    }

    let array: ArrayRef = match first {
        None => new_null_array(&DataType::Null, values.len()),
        Some(DataValue::Bool(_)) => Arc::new(
            values
                .iter()
                .map(|v| v.as_bool())
                .collect::<BooleanArray>(),
        ),
        Some(DataValue::Int(_)) => {
            Arc::new(values.iter().map(|v| v.as_int()).collect::<Int64Array>())
        }
        Some(DataValue::Float(_)) => {
            Arc::new(values.iter().map(|v| v.as_float()).collect::<Float64Array>())
        }
        Some(DataValue::Date(_)) => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    DataValue::Date(d) => {
                        Some(d.signed_duration_since(unix_epoch()).num_days() as i32)
                    }
                    _ => None,
                })
                .collect::<Date32Array>(),
        ),
        Some(DataValue::Timestamp(_)) => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    DataValue::Timestamp(ts) => Some(ts.and_utc().timestamp_micros()),
                    _ => None,
                })
                .collect::<TimestampMicrosecondArray>(),
        ),
        Some(DataValue::String(_)) => {
            Arc::new(values.iter().map(|v| v.as_string()).collect::<StringArray>())
        }
        Some(DataValue::Null) => return None,
    };
    Some(array)
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, name: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ExpectationError::engine(format!(
            "Failed to downcast {} column to {name}",
            array.data_type()
        ))
    })
}

/// Reads the value at `row_idx`.
///
/// Supports exactly the Arrow types backing [`ColumnType`].
pub(crate) fn array_value(array: &ArrayRef, row_idx: usize) -> Result<DataValue> {
    if array.is_null(row_idx) {
        return Ok(DataValue::Null);
    }

    let value = match array.data_type() {
        DataType::Boolean => {
            DataValue::Bool(downcast::<BooleanArray>(array, "BooleanArray")?.value(row_idx))
        }
        DataType::Int32 => {
            DataValue::Int(downcast::<Int32Array>(array, "Int32Array")?.value(row_idx) as i64)
        }
        DataType::Int64 => DataValue::Int(downcast::<Int64Array>(array, "Int64Array")?.value(row_idx)),
        DataType::Float32 => DataValue::Float(
            downcast::<Float32Array>(array, "Float32Array")?.value(row_idx) as f64,
        ),
        DataType::Float64 => {
            DataValue::Float(downcast::<Float64Array>(array, "Float64Array")?.value(row_idx))
        }
        DataType::Utf8 => DataValue::String(
            downcast::<StringArray>(array, "StringArray")?
                .value(row_idx)
                .to_string(),
        ),
        DataType::Date32 => {
            let date = downcast::<Date32Array>(array, "Date32Array")?
                .value_as_date(row_idx)
                .ok_or_else(|| ExpectationError::engine("Invalid date value"))?;
            DataValue::Date(date)
        }
        DataType::Timestamp(_, None) => {
            let ts = downcast::<TimestampMicrosecondArray>(array, "TimestampMicrosecondArray")?
                .value_as_datetime(row_idx)
                .ok_or_else(|| ExpectationError::engine("Invalid timestamp value"))?;
            DataValue::Timestamp(ts)
        }
        other => return Err(ExpectationError::invalid_type(other.to_string())),
    };

    Ok(value)
}

/// Reads every value of a column.
pub(crate) fn array_values(array: &ArrayRef) -> Result<Vec<DataValue>> {
    (0..array.len()).map(|idx| array_value(array, idx)).collect()
}
