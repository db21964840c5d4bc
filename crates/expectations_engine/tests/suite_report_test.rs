//! End-to-end tests: suite files loaded from disk, run against a dataset,
//! and reported through the session.

use expectations_core::{ColumnSpec, ColumnType, DataValue};
use expectations_engine::{
    Dataset, ReportFormat, Session, ValidationContext, build_report, render_report,
};
use expectations_parser::{parse_file, parse_yaml};
use pretty_assertions::assert_eq;
use std::io::Write;

const ORDERS_SUITE: &str = r#"
name: orders
description: Nightly orders extract

expectations:
  - name: column_count
    type: table_column_count
    min: 3
    max: 3

  - name: layout
    type: ordered_column_list
    columns: [order_id, order_date, amount]

  - name: unique_order_id
    type: unique_column_values
    column: order_id

  - name: march_only
    type: column_value_range
    column: order_date
    min: "2024-03-01"
    max: "2024-03-31"

  - name: amount
    type: column_min_max_range
    column: amount
    min: 0
    max: 500
"#;

fn orders(session: &Session) -> Dataset {
    let day = |d| DataValue::from(format!("2024-03-{d:02}"));

    session
        .create_dataset(
            vec![
                ColumnSpec::new("order_id", ColumnType::Long),
                ColumnSpec::new("order_date", ColumnType::Date),
                ColumnSpec::new("amount", ColumnType::Double),
            ],
            vec![
                vec![DataValue::Int(100), day(1), DataValue::Float(19.99)],
                vec![DataValue::Int(101), day(15), DataValue::Float(640.0)],
                vec![DataValue::Int(102), day(31), DataValue::Null],
            ],
        )
        .unwrap()
}

fn write_suite(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_suite_file_runs_against_dataset() {
    let file = write_suite(ORDERS_SUITE);
    let suite = parse_file(file.path()).unwrap();

    let session = Session::new();
    let dataset = orders(&session);
    let (outcomes, results) = ValidationContext::wrap(&dataset).run_suite(&suite).unwrap();

    let recorded: Vec<(&str, bool)> = outcomes.iter().collect();
    assert_eq!(
        recorded,
        vec![
            ("column_count", true),
            ("layout", true),
            ("unique_order_id", true),
            ("march_only", true),
            ("amount_min", true),
            ("amount_max", false),
        ]
    );
    assert_eq!(results[5].observed_value, serde_json::json!(640.0));
}

#[test]
fn test_date_shaped_bounds_on_string_column() {
    let suite = parse_yaml(
        r#"
name: labels
expectations:
  - name: label_in_2024
    type: column_value_range
    column: label
    min: "2024-01-01"
    max: "2024-12-31"
"#,
    )
    .unwrap();

    let session = Session::new();
    let dataset = session
        .create_dataset(
            vec![ColumnSpec::new("label", ColumnType::String)],
            vec![vec![DataValue::from("2024-03-05")]],
        )
        .unwrap();

    let (outcomes, _) = ValidationContext::wrap(&dataset).run_suite(&suite).unwrap();
    assert_eq!(outcomes.get("label_in_2024"), Some(true));
}

#[test]
fn test_rendered_json_matches_outcomes() {
    let file = write_suite(ORDERS_SUITE);
    let suite = parse_file(file.path()).unwrap();

    let session = Session::new();
    let dataset = orders(&session);
    let (outcomes, _) = ValidationContext::wrap(&dataset).run_suite(&suite).unwrap();

    let rendered: serde_json::Value =
        serde_json::from_str(&render_report(&outcomes, ReportFormat::Json)).unwrap();
    assert_eq!(rendered["summary"]["total"], serde_json::json!(6));
    assert_eq!(rendered["summary"]["failed"], serde_json::json!(1));
    assert_eq!(rendered["results"][5]["status"], serde_json::json!("Failed"));
}

#[tokio::test]
async fn test_report_can_be_queried_with_sql() {
    let file = write_suite(ORDERS_SUITE);
    let suite = parse_file(file.path()).unwrap();

    let session = Session::builder()
        .app_name("orders-nightly")
        .target_partitions(1)
        .build();
    let dataset = orders(&session);
    let (outcomes, _) = ValidationContext::wrap(&dataset).run_suite(&suite).unwrap();

    let report = build_report(&session, &outcomes).unwrap();
    session.register("report", &report).unwrap();

    let failed = session
        .sql(r#"SELECT "Expectation" FROM report WHERE "Status" = 'Failed'"#)
        .await
        .unwrap();

    assert_eq!(
        failed.column_values("Expectation").unwrap(),
        vec![DataValue::from("amount_max")]
    );
}
