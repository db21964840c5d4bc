//! Engine session.
//!
//! A [`Session`] owns a DataFusion `SessionContext`. It is created by the
//! caller, passed to every operation that needs the engine, and released when
//! dropped. Nothing in this crate creates a session implicitly.

use crate::{Dataset, convert};
use arrow_array::{ArrayRef, RecordBatch};
use arrow_cast::cast::cast_with_options;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use datafusion::prelude::{DataFrame, SessionConfig, SessionContext};
use expectations_core::{ColumnSpec, ColumnType, DataValue, ExpectationError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "expectations";

/// Explicitly managed engine session.
pub struct Session {
    app_name: String,
    ctx: SessionContext,
}

impl Session {
    /// Creates a session with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for `Session`.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Application name this session was created with.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The underlying DataFusion context.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Builds a dataset from rows of literal values.
    ///
    /// Every value is cast to its column's declared type. Fails with `Shape`
    /// if a row's length differs from the number of columns or a column name
    /// repeats, and with `ValueCast` if a value does not convert.
    pub fn create_dataset(
        &self,
        columns: Vec<ColumnSpec>,
        rows: Vec<Vec<DataValue>>,
    ) -> Result<Dataset> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = columns.iter().find(|spec| !seen.insert(spec.name.as_str())) {
            return Err(ExpectationError::shape(format!(
                "duplicate column name '{}'",
                duplicate.name
            )));
        }

        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ExpectationError::shape(format!(
                "row {} has {} values, expected {}",
                idx,
                row.len(),
                columns.len()
            )));
        }

        let row_count = rows.len();
        let mut by_column: Vec<Vec<DataValue>> = vec![Vec::with_capacity(row_count); columns.len()];
        for row in rows {
            for (values, value) in by_column.iter_mut().zip(row) {
                values.push(value);
            }
        }

        let arrays = columns
            .into_iter()
            .zip(by_column)
            .map(|(spec, values)| {
                let array = convert::values_to_array(&values, spec.column_type, &spec.name)?;
                Ok((spec, array))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Created dataset with {} columns and {} rows",
            arrays.len(),
            row_count
        );

        Dataset::from_columns(arrays, row_count)
    }

    /// Exposes a dataset as a SQL table, replacing any table of the same name.
    pub fn register(&self, name: &str, dataset: &Dataset) -> Result<()> {
        self.ctx
            .deregister_table(name)
            .map_err(ExpectationError::engine)?;
        self.ctx
            .register_batch(name, dataset.record_batch().clone())
            .map_err(ExpectationError::engine)?;

        debug!("Registered table '{}' ({} rows)", name, dataset.row_count());
        Ok(())
    }

    /// Runs a SQL query and collects the result into one dataset.
    ///
    /// Result columns are normalized to the supported column types (for
    /// example string views become plain strings).
    pub async fn sql(&self, query: &str) -> Result<Dataset> {
        debug!("Executing query: {}", query);

        let frame = self.ctx.sql(query).await.map_err(ExpectationError::engine)?;
        self.collect(frame).await
    }

    /// Reads a registered table back as a dataset.
    pub async fn table(&self, name: &str) -> Result<Dataset> {
        let frame = self.ctx.table(name).await.map_err(ExpectationError::engine)?;
        self.collect(frame).await
    }

    async fn collect(&self, frame: DataFrame) -> Result<Dataset> {
        let schema: SchemaRef = Arc::clone(frame.schema().inner());
        let batches = frame.collect().await.map_err(ExpectationError::engine)?;
        let batch = arrow_select::concat::concat_batches(&schema, &batches)?;
        Dataset::try_new(normalize(batch)?)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("app_name", &self.app_name)
            .field("session_id", &self.ctx.session_id())
            .finish()
    }
}

/// Builder for `Session`.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    app_name: Option<String>,
    target_partitions: Option<usize>,
    batch_size: Option<usize>,
}

impl SessionBuilder {
    /// Sets the application name.
    pub fn app_name<S: Into<String>>(mut self, name: S) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the number of partitions used for query execution.
    pub fn target_partitions(mut self, partitions: usize) -> Self {
        self.target_partitions = Some(partitions);
        self
    }

    /// Sets the number of rows per batch produced by queries.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Builds the `Session`.
    ///
    /// Zero values for partitions or batch size are ignored.
    pub fn build(self) -> Session {
        let mut config = SessionConfig::new();
        if let Some(partitions) = self.target_partitions.filter(|n| *n > 0) {
            config = config.with_target_partitions(partitions);
        }
        if let Some(batch_size) = self.batch_size.filter(|n| *n > 0) {
            config = config.with_batch_size(batch_size);
        }

        let app_name = self.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        info!(
            "Starting session '{}' (partitions: {}, batch size: {})",
            app_name,
            config.target_partitions(),
            config.batch_size()
        );

        Session {
            app_name,
            ctx: SessionContext::new_with_config(config),
        }
    }
}

/// The column type a query result column is converted to.
fn normalized_type(data_type: &DataType) -> Option<ColumnType> {
    ColumnType::from_data_type(data_type).or(match data_type {
        DataType::Utf8View | DataType::LargeUtf8 => Some(ColumnType::String),
        DataType::Int8 | DataType::Int16 | DataType::UInt8 | DataType::UInt16 => {
            Some(ColumnType::Integer)
        }
        DataType::UInt32 | DataType::UInt64 => Some(ColumnType::Long),
        DataType::Float16 => Some(ColumnType::Float),
        DataType::Date64 => Some(ColumnType::Date),
        DataType::Timestamp(_, _) => Some(ColumnType::Timestamp),
        DataType::Null => Some(ColumnType::String),
        _ => None,
    })
}

fn normalize(batch: RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let needs_cast = schema
        .fields()
        .iter()
        .any(|field| ColumnType::from_data_type(field.data_type()).is_none());
    if !needs_cast {
        return Ok(batch);
    }

    let mut fields = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let column_type = normalized_type(field.data_type())
            .ok_or_else(|| ExpectationError::invalid_type(field.data_type().to_string()))?;
        let target = column_type.data_type();

        columns.push(if column.data_type() == &target {
            Arc::clone(column)
        } else {
            cast_with_options(column, &target, &convert::checked())?
        });
        fields.push(Field::new(field.name(), target, true));
    }

    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &arrow_array::RecordBatchOptions::new().with_row_count(Some(batch.num_rows())),
    )?)
}
