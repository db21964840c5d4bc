//! Result reporting.
//!
//! Turns an [`OutcomeMap`] into a two-column dataset, one row per expectation
//! in insertion order.

use crate::{Dataset, Session};
use expectations_core::{ColumnSpec, ColumnType, DataValue, ExpectationError, OutcomeMap, Result};
use tracing::debug;

/// Name of the report column holding expectation names.
pub const EXPECTATION_COLUMN: &str = "Expectation";

/// Name of the report column holding the status label.
pub const STATUS_COLUMN: &str = "Status";

/// Status label of a passed expectation.
pub const PASSED: &str = "Passed";

/// Status label of a failed expectation.
pub const FAILED: &str = "Failed";

/// Maps a success flag to its status label.
pub fn status_label(success: bool) -> &'static str {
    if success { PASSED } else { FAILED }
}

/// Column layout shared by every report.
pub fn report_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new(EXPECTATION_COLUMN, ColumnType::String),
        ColumnSpec::new(STATUS_COLUMN, ColumnType::String),
    ]
}

/// Builds the report dataset.
///
/// Entries are never reordered, merged or dropped. An empty map yields a
/// report with both columns and zero rows.
///
/// # Example
///
/// ```rust
/// use expectations_core::OutcomeMap;
/// use expectations_engine::{Session, build_report};
///
/// let session = Session::new();
/// let outcomes: OutcomeMap = [("A", true), ("B", false)].into_iter().collect();
///
/// let report = build_report(&session, &outcomes).unwrap();
/// assert_eq!(report.row_count(), 2);
/// ```
pub fn build_report(session: &Session, outcomes: &OutcomeMap) -> Result<Dataset> {
    let rows = outcomes
        .iter()
        .map(|(name, success)| {
            vec![
                DataValue::from(name),
                DataValue::from(status_label(success)),
            ]
        })
        .collect();

    debug!(
        "Building report with {} entries ({} failed)",
        outcomes.len(),
        outcomes.failed_count()
    );

    session.create_dataset(report_columns(), rows)
}

/// Builds the report dataset, treating an empty map as an error.
///
/// Fails with `EmptyReport` when `outcomes` is empty.
pub fn build_non_empty_report(session: &Session, outcomes: &OutcomeMap) -> Result<Dataset> {
    if outcomes.is_empty() {
        return Err(ExpectationError::EmptyReport);
    }
    build_report(session, outcomes)
}
