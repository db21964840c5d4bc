//! Parser for expectation suites (YAML/TOML formats).
//!
//! This module loads expectation suites from YAML and TOML documents into the
//! strongly-typed `ExpectationSuite` structure.
//!
//! # Example
//!
//! ```rust
//! use expectations_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: people
//! expectations:
//!   - name: row_count
//!     type: table_row_count
//!     min: 1
//!     max: 1000
//!   - name: unique_id
//!     type: unique_column_values
//!     column: id
//! "#;
//!
//! let suite = parse_yaml(yaml).expect("Failed to parse suite");
//! assert_eq!(suite.name, "people");
//! assert_eq!(suite.expectations.len(), 2);
//! ```

use expectations_core::ExpectationSuite;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during suite parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Suite parsed but is not well-formed
    #[error("Invalid suite definition: {0}")]
    InvalidSuite(String),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported suite file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a suite from a YAML string.
///
/// # Example
///
/// ```rust
/// use expectations_parser::parse_yaml;
///
/// let yaml = r#"
/// name: layout
/// expectations:
///   - name: columns
///     type: ordered_column_list
///     columns: [id, name]
/// "#;
///
/// let suite = parse_yaml(yaml).unwrap();
/// assert_eq!(suite.name, "layout");
/// ```
pub fn parse_yaml(content: &str) -> Result<ExpectationSuite> {
    let suite: ExpectationSuite = serde_yaml_ng::from_str(content)?;
    validate_definition(&suite)?;
    Ok(suite)
}

/// Parse a suite from a TOML string.
///
/// # Example
///
/// ```rust
/// use expectations_parser::parse_toml;
///
/// let toml = r#"
/// name = "people"
///
/// [[expectations]]
/// name = "has_age"
/// type = "column_existence"
/// column = "age"
/// "#;
///
/// let suite = parse_toml(toml).unwrap();
/// assert_eq!(suite.expectations.len(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<ExpectationSuite> {
    let suite: ExpectationSuite =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    validate_definition(&suite)?;
    Ok(suite)
}

/// Detect the suite format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SuiteFormat::Yaml`
/// * `.toml` → `SuiteFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SuiteFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SuiteFormat::Yaml),
        "toml" => Ok(SuiteFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a suite from a file with automatic format detection.
///
/// ```no_run
/// use expectations_parser::parse_file;
/// use std::path::Path;
///
/// let suite = parse_file(Path::new("suites/orders.yml")).unwrap();
/// println!("Loaded suite: {}", suite.name);
/// ```
pub fn parse_file(path: &Path) -> Result<ExpectationSuite> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "Parsing expectation suite");

    match format {
        SuiteFormat::Yaml => parse_yaml(&content),
        SuiteFormat::Toml => parse_toml(&content),
    }
}

/// Checks that a suite is well-formed.
///
/// Outcome names must be unique and non-empty, including the `<name>_min` and
/// `<name>_max` outcomes a min/max range check reports under. Column names
/// must be non-empty.
pub fn validate_definition(suite: &ExpectationSuite) -> Result<()> {
    let mut seen = HashSet::new();

    for expectation in &suite.expectations {
        if expectation.name.trim().is_empty() {
            return Err(ParserError::InvalidSuite(
                "expectation name cannot be empty".to_string(),
            ));
        }

        if expectation.config.column().is_some_and(|c| c.trim().is_empty()) {
            return Err(ParserError::InvalidSuite(format!(
                "expectation '{}' has an empty column name",
                expectation.name
            )));
        }

        for name in expectation.outcome_names() {
            if !seen.insert(name.clone()) {
                return Err(ParserError::InvalidSuite(format!(
                    "duplicate expectation name: {name}"
                )));
            }
        }
    }

    Ok(())
}
