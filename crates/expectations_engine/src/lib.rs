//! # Expectations Engine
//!
//! Arrow-backed datasets and the operations run against them:
//!
//! - Schema mutation (literal columns, type casts)
//! - Expectation evaluation (counts, ranges, min/max, uniqueness, column layout)
//! - Suite execution over declarative expectation lists
//! - Result reporting as a two-column dataset, text or JSON
//!
//! All engine work goes through an explicitly created [`Session`].
//!
//! ## Example
//!
//! ```rust
//! use expectations_core::{ColumnSpec, ColumnType, DataValue, OutcomeMap};
//! use expectations_engine::{Session, ValidationContext, add_column, build_report};
//!
//! let session = Session::new();
//! let dataset = session
//!     .create_dataset(
//!         vec![
//!             ColumnSpec::new("id", ColumnType::Long),
//!             ColumnSpec::new("age", ColumnType::Integer),
//!         ],
//!         vec![
//!             vec![DataValue::Int(1), DataValue::Int(34)],
//!             vec![DataValue::Int(2), DataValue::Int(58)],
//!         ],
//!     )
//!     .unwrap();
//! let dataset = add_column(&dataset, "source", "crm", "string").unwrap();
//!
//! let ctx = ValidationContext::wrap(&dataset);
//! let mut outcomes = OutcomeMap::new();
//! outcomes.record("unique_id", &ctx.expect_unique_column_values("id").unwrap());
//! outcomes.record("age_range", &ctx.expect_column_value_range("age", 0, 120).unwrap());
//!
//! let report = build_report(&session, &outcomes).unwrap();
//! assert_eq!(report.row_count(), 2);
//! ```

mod convert;
mod dataset;
mod mutator;
mod output;
mod report;
mod runner;
mod session;
mod suite;

pub use dataset::*;
pub use mutator::*;
pub use output::*;
pub use report::*;
pub use runner::*;
pub use session::*;
