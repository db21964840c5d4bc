//! Human and machine readable rendering of outcome maps.

use crate::report::{FAILED, PASSED, status_label};
use colored::*;
use expectations_core::OutcomeMap;
use serde_json::json;
use std::str::FromStr;

/// Output format for [`render_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Colored, boxed text for terminals
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unsupported report format: {}", other)),
        }
    }
}

/// Renders an outcome map in the requested format.
pub fn render_report(outcomes: &OutcomeMap, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => render_text(outcomes),
        ReportFormat::Json => render_json(outcomes),
    }
}

fn render_text(outcomes: &OutcomeMap) -> String {
    let rule = "═".repeat(60);
    let width = outcomes
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Expectation".len());

    let verdict = if outcomes.all_passed() {
        format!("{} {}", "✓".green().bold(), "All expectations PASSED".green().bold())
    } else {
        format!("{} {}", "✗".red().bold(), "Some expectations FAILED".red().bold())
    };

    let mut lines = vec![
        rule.clone(),
        "  EXPECTATION REPORT".bold().to_string(),
        rule.clone(),
        String::new(),
        verdict,
    ];

    if !outcomes.is_empty() {
        lines.push(String::new());
        lines.extend(outcomes.iter().map(|(name, success)| {
            let status = if success { PASSED.green() } else { FAILED.red() };
            format!("  {name:<width$}  {status}")
        }));
    }

    lines.push(String::new());
    lines.push("Summary:".bold().to_string());
    lines.push(format!("  Total:  {}", outcomes.len()));
    lines.push(format!("  Passed: {}", outcomes.passed_count()));
    lines.push(format!("  Failed: {}", outcomes.failed_count()));
    lines.push(rule);

    lines.join("\n")
}

fn render_json(outcomes: &OutcomeMap) -> String {
    let output = json!({
        "success": outcomes.all_passed(),
        "results": outcomes
            .iter()
            .map(|(name, success)| json!({
                "expectation": name,
                "status": status_label(success),
            }))
            .collect::<Vec<_>>(),
        "summary": {
            "total": outcomes.len(),
            "passed": outcomes.passed_count(),
            "failed": outcomes.failed_count(),
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn outcomes() -> OutcomeMap {
        [("row_count", true), ("unique_id", false)].into_iter().collect()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_render_json() {
        let rendered = render_report(&outcomes(), ReportFormat::Json);
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(
            value["results"],
            json!([
                {"expectation": "row_count", "status": "Passed"},
                {"expectation": "unique_id", "status": "Failed"},
            ])
        );
        assert_eq!(value["summary"]["failed"], json!(1));
    }

    #[test]
    fn test_render_text_lists_every_entry() {
        colored::control::set_override(false);
        let rendered = render_report(&outcomes(), ReportFormat::Text);

        assert!(rendered.contains("Some expectations FAILED"));
        assert!(rendered.contains("row_count    Passed"));
        assert!(rendered.contains("unique_id    Failed"));
        assert!(rendered.contains("Passed: 1"));
    }

    #[test]
    fn test_render_text_layout() {
        colored::control::set_override(false);
        let rule = "═".repeat(60);
        let rendered = render_report(&outcomes(), ReportFormat::Text);

        let expected = [
            rule.as_str(),
            "  EXPECTATION REPORT",
            rule.as_str(),
            "",
            "✗ Some expectations FAILED",
            "",
            "  row_count    Passed",
            "  unique_id    Failed",
            "",
            "Summary:",
            "  Total:  2",
            "  Passed: 1",
            "  Failed: 1",
            rule.as_str(),
        ]
        .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_text_empty() {
        colored::control::set_override(false);
        let rendered = render_report(&OutcomeMap::new(), ReportFormat::Text);
        assert!(rendered.contains("Total:  0"));
    }
}
