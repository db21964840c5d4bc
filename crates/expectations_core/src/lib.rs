//! # Expectations Core
//!
//! Core data structures shared by the expectations workspace.
//!
//! ## Key Concepts
//!
//! - **ColumnType**: closed set of primitive column types, validated at the call boundary
//! - **DataValue**: scalar cell value used for literals, bounds and rows
//! - **ExpectationResult**: success flag of a check plus opaque diagnostics
//! - **OutcomeMap**: insertion-ordered name → success record, the input of reports
//! - **ExpectationSuite**: named, declarative list of checks
//!
//! ## Example
//!
//! ```rust
//! use expectations_core::{ColumnType, OutcomeMap};
//!
//! let column_type: ColumnType = "bigint".parse().unwrap();
//! assert_eq!(column_type, ColumnType::Long);
//!
//! let mut outcomes = OutcomeMap::new();
//! outcomes.insert("row_count", true);
//! outcomes.insert("unique_id", false);
//! assert_eq!(outcomes.failed_count(), 1);
//! ```

pub mod builder;
pub mod column;
pub mod error;
pub mod result;
pub mod suite;
pub mod value;

pub use builder::*;
pub use column::*;
pub use error::*;
pub use result::*;
pub use suite::*;
pub use value::*;
