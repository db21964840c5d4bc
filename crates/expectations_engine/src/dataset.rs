//! Dataset representation.
//!
//! A [`Dataset`] wraps a single Arrow `RecordBatch` whose columns all map to a
//! [`ColumnType`]. Datasets are values: every operation that changes columns
//! returns a new dataset, and cloning only bumps reference counts.

use crate::convert;
use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_schema::{Field, Schema, SchemaRef};
use expectations_core::{ColumnSpec, ColumnType, DataValue, ExpectationError, Result};
use std::fmt;
use std::sync::Arc;

/// An immutable table of named, typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    batch: RecordBatch,
}

impl Dataset {
    /// Wraps a record batch.
    ///
    /// Fails with `InvalidType` if any column uses an Arrow type outside the
    /// supported [`ColumnType`] set.
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        for field in batch.schema().fields() {
            if ColumnType::from_data_type(field.data_type()).is_none() {
                return Err(ExpectationError::invalid_type(field.data_type().to_string()));
            }
        }
        Ok(Self { batch })
    }

    /// Creates a dataset with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
        }
    }

    /// Assembles a dataset from column specs and equally long arrays.
    pub(crate) fn from_columns(
        columns: Vec<(ColumnSpec, ArrayRef)>,
        row_count: usize,
    ) -> Result<Self> {
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns
            .into_iter()
            .map(|(spec, array)| (Field::new(spec.name, spec.column_type.data_type(), true), array))
            .unzip();

        let options = RecordBatchOptions::new().with_row_count(Some(row_count));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(Self { batch })
    }

    /// Returns the underlying record batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Consumes the dataset, returning the record batch.
    pub fn into_record_batch(self) -> RecordBatch {
        self.batch
    }

    /// Returns the Arrow schema.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.batch.num_columns()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in declared order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// Column specs in declared order.
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        self.batch
            .schema()
            .fields()
            .iter()
            .filter_map(|field| {
                ColumnType::from_data_type(field.data_type())
                    .map(|column_type| ColumnSpec::new(field.name().clone(), column_type))
            })
            .collect()
    }

    /// Returns true if a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.batch.schema().index_of(name).ok()
    }

    /// Returns a column's array.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| ExpectationError::column_not_found(name))
    }

    /// Returns a column's declared type.
    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        let column = self.column(name)?;
        ColumnType::from_data_type(column.data_type())
            .ok_or_else(|| ExpectationError::invalid_type(column.data_type().to_string()))
    }

    /// Reads all values of a column.
    pub fn column_values(&self, name: &str) -> Result<Vec<DataValue>> {
        convert::array_values(self.column(name)?)
    }

    /// Reads the dataset row by row.
    pub fn rows(&self) -> Result<Vec<Vec<DataValue>>> {
        (0..self.row_count())
            .map(|row_idx| {
                self.batch
                    .columns()
                    .iter()
                    .map(|column| convert::array_value(column, row_idx))
                    .collect()
            })
            .collect()
    }

    /// Returns a new dataset with `array` stored under `name`.
    ///
    /// An existing column of the same name is replaced in place; otherwise the
    /// column is appended.
    pub(crate) fn with_column(
        &self,
        name: &str,
        column_type: ColumnType,
        array: ArrayRef,
    ) -> Result<Dataset> {
        let mut columns: Vec<(ColumnSpec, ArrayRef)> = self
            .column_specs()
            .into_iter()
            .zip(self.batch.columns().iter().cloned())
            .collect();

        let spec = ColumnSpec::new(name, column_type);
        match columns.iter().position(|(existing, _)| existing.name == name) {
            Some(idx) => columns[idx] = (spec, array),
            None => columns.push((spec, array)),
        }

        Dataset::from_columns(columns, self.row_count())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<RecordBatch> for Dataset {
    type Error = ExpectationError;

    fn try_from(batch: RecordBatch) -> Result<Self> {
        Dataset::try_new(batch)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = arrow_cast::pretty::pretty_format_batches(std::slice::from_ref(&self.batch))
            .map_err(|_| fmt::Error)?;
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{Int64Array, StringArray, UInt8Array};
    use pretty_assertions::assert_eq;

    fn people() -> Dataset {
        let schema = Schema::new(vec![
            Field::new("id", arrow_schema::DataType::Int64, false),
            Field::new("name", arrow_schema::DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec![Some("ann"), None, Some("cy")])),
            ],
        )
        .unwrap();
        Dataset::try_new(batch).unwrap()
    }

    #[test]
    fn test_dataset_shape() {
        let dataset = people();
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.row_count(), 3);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.column_names(), vec!["id", "name"]);
        assert_eq!(
            dataset.column_specs(),
            vec![
                ColumnSpec::new("id", ColumnType::Long),
                ColumnSpec::new("name", ColumnType::String),
            ]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::empty();
        assert_eq!(dataset.column_count(), 0);
        assert_eq!(dataset.row_count(), 0);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_unsupported_arrow_type_rejected() {
        let schema = Schema::new(vec![Field::new("flag", arrow_schema::DataType::UInt8, false)]);
        let batch =
            RecordBatch::try_new(Arc::new(schema), vec![Arc::new(UInt8Array::from(vec![1u8]))])
                .unwrap();
        let err = Dataset::try_from(batch).unwrap_err();
        assert!(matches!(err, ExpectationError::InvalidType(_)));
    }

    #[test]
    fn test_column_lookup() {
        let dataset = people();
        assert_eq!(dataset.column_index("name"), Some(1));
        assert!(dataset.has_column("id"));
        assert_eq!(dataset.column_type("id").unwrap(), ColumnType::Long);
        assert!(matches!(
            dataset.column("missing").unwrap_err(),
            ExpectationError::ColumnNotFound(name) if name == "missing"
        ));
    }

    #[test]
    fn test_rows_and_values() {
        let dataset = people();
        assert_eq!(
            dataset.column_values("name").unwrap(),
            vec![DataValue::from("ann"), DataValue::Null, DataValue::from("cy")]
        );
        assert_eq!(
            dataset.rows().unwrap()[0],
            vec![DataValue::Int(1), DataValue::from("ann")]
        );
    }

    #[test]
    fn test_with_column_replaces_in_place() {
        let dataset = people();
        let replaced = dataset
            .with_column(
                "id",
                ColumnType::String,
                Arc::new(StringArray::from(vec!["a", "b", "c"])),
            )
            .unwrap();

        assert_eq!(replaced.column_names(), vec!["id", "name"]);
        assert_eq!(replaced.column_type("id").unwrap(), ColumnType::String);
        // the source dataset is untouched
        assert_eq!(dataset.column_type("id").unwrap(), ColumnType::Long);
    }

    #[test]
    fn test_display_renders_table() {
        let rendered = people().to_string();
        assert!(rendered.contains("| id | name |"));
        assert!(rendered.contains("ann"));
    }
}
