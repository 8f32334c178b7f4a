//! Integration tests for the data quality engine.
//!
//! These tests verify end-to-end behavior: in-memory scoring, the CSV
//! directory loader and the written artifacts.

use dq_scoring::{
    ColumnQualityRecord, CsvDirectoryLoader, Dimension, QualityConfig, QualityEngine,
    QualityRunResult, RunSummary, SourceColumn, SourceTable, TableLoader, UNIQUENESS_NOTE,
    reporting::{DETAILED_RESULTS_FILE, RUN_SUMMARY_FILE, SUMMARY_CSV_FILE},
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

const FIXED_TS: &str = "2026-01-01T00:00:00.000000";

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn engine() -> QualityEngine {
    QualityEngine::builder().build().unwrap()
}

fn engine_with_threshold(threshold: f64) -> QualityEngine {
    let config = QualityConfig::builder().threshold(threshold).build().unwrap();
    QualityEngine::builder().config(config).build().unwrap()
}

fn single_column(column: SourceColumn) -> QualityRunResult {
    let table = SourceTable::new("t", vec![column]).unwrap();
    engine().run_tables_at(vec![table], FIXED_TS)
}

fn record<'a>(result: &'a QualityRunResult, table: &str, column: &str) -> &'a ColumnQualityRecord {
    result
        .records
        .iter()
        .find(|r| r.table_name == table && r.column_name == column)
        .unwrap_or_else(|| panic!("no record for {}.{}", table, column))
}

fn fixture_run() -> QualityRunResult {
    let loader = CsvDirectoryLoader::new(fixtures_path());
    engine().run(&loader).unwrap()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_completeness_of_partially_null_column() {
    let result = single_column(SourceColumn::numeric(
        "value",
        [Some(1.0), Some(2.0), Some(3.0), None],
    ));
    let r = &result.records[0];

    assert_eq!(r.completeness.score, 75.0);
    assert_eq!(r.completeness.valid_records, 3);
    assert_eq!(r.completeness.invalid_records, 1);
    assert!(!r.overall_passed);
}

#[test]
fn test_email_conformity() {
    let result = single_column(SourceColumn::text(
        "email",
        [Some("a@b.com"), Some("bad"), Some("c@d.org"), None],
    ));
    let r = &result.records[0];

    assert_eq!(r.conformity.score, 50.0);
    assert_eq!(r.conformity.valid_records, 2);
    assert_eq!(r.conformity.invalid_records, 2);
}

#[test]
fn test_accuracy_flags_iqr_outlier() {
    let result = single_column(SourceColumn::numeric(
        "value",
        [Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(100.0)],
    ));
    let r = &result.records[0];

    assert_eq!(r.accuracy.score, 80.0);
    assert_eq!(r.accuracy.valid_records, 4);
}

#[test]
fn test_table_average_of_two_columns() {
    // "full" scores 100 everywhere; "half" scores 50 on every scored dimension
    let table = SourceTable::new(
        "t",
        vec![
            SourceColumn::text("full", [Some("a"), Some("b")]),
            SourceColumn::text("half", [Some("a"), None]),
        ],
    )
    .unwrap();
    let result = engine().run_tables_at(vec![table], FIXED_TS);

    assert_eq!(record(&result, "t", "full").overall_score, 100.0);
    assert_eq!(record(&result, "t", "half").overall_score, 50.0);

    let summary = result.summary.table("t").unwrap();
    assert_eq!(summary.average_score, 75.0);
    assert!(!summary.passed);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_dimension_counts_add_up_to_row_count() {
    let result = fixture_run();
    for r in &result.records {
        for dimension in Dimension::ALL {
            let d = r.dimension(dimension);
            assert_eq!(
                d.valid_records + d.invalid_records,
                r.total_rows,
                "{}.{} {:?}",
                r.table_name,
                r.column_name,
                dimension
            );
            assert!((0.0..=100.0).contains(&d.score));
        }
    }
}

#[test]
fn test_overall_score_is_mean_of_five_dimensions() {
    let result = fixture_run();
    for r in &result.records {
        let mean = (r.completeness.score
            + r.validity.score
            + r.accuracy.score
            + r.consistency.score
            + r.conformity.score)
            / 5.0;
        assert!(
            (r.overall_score - mean).abs() <= 0.005 + 1e-9,
            "{}.{}: {} vs {}",
            r.table_name,
            r.column_name,
            r.overall_score,
            mean
        );
        assert_eq!(r.overall_passed, r.overall_score >= 98.0);
    }
}

#[test]
fn test_half_way_scores_round_to_even() {
    let values: Vec<Option<f64>> = std::iter::once(Some(1.0))
        .chain(std::iter::repeat(None).take(31))
        .collect();
    let result = single_column(SourceColumn::numeric("value", values));
    let r = &result.records[0];

    assert_eq!(r.completeness.score, 3.12);
    assert_eq!(r.overall_score, 3.12);
}

#[test]
fn test_uniqueness_never_changes_the_verdict() {
    let result = single_column(SourceColumn::numeric("flag", [Some(1.0); 50]));
    let r = &result.records[0];

    assert_eq!(r.uniqueness.score, 2.0);
    assert_eq!(r.overall_score, 100.0);
    assert!(r.overall_passed);
}

#[test]
fn test_nulls_are_not_distinct_values() {
    let result = single_column(SourceColumn::text("code", [Some("a"), None, None, None]));
    assert_eq!(result.records[0].uniqueness.valid_records, 1);
    assert_eq!(result.profiles[0].distinct_count, 1);
}

#[test]
fn test_idempotent_runs() {
    let tables = || {
        vec![
            SourceTable::new(
                "orders",
                vec![
                    SourceColumn::text("order_id", [Some("o1"), Some("o2"), Some("o2")]),
                    SourceColumn::numeric("price", [Some(1.5), None, Some(1e9)]),
                ],
            )
            .unwrap(),
        ]
    };

    let first = engine().run_tables_at(tables(), FIXED_TS);
    let second = engine().run_tables_at(tables(), FIXED_TS);

    assert_eq!(first.records, second.records);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.profiles, second.profiles);
}

#[test]
fn test_all_null_column() {
    let result = single_column(SourceColumn::numeric("missing", [None, None, None]));
    let r = &result.records[0];

    for dimension in Dimension::ALL {
        assert_eq!(r.dimension(dimension).score, 0.0, "{:?}", dimension);
    }
    assert_eq!(r.overall_score, 0.0);
    assert!(!r.overall_passed);
    assert_eq!(result.profiles[0].distinct_count, 0);
}

#[test]
fn test_zero_row_table() {
    let table = SourceTable::new(
        "empty",
        vec![
            SourceColumn::numeric("a", Vec::<Option<f64>>::new()),
            SourceColumn::text("b", Vec::<Option<String>>::new()),
        ],
    )
    .unwrap();
    let result = engine().run_tables_at(vec![table], FIXED_TS);

    assert_eq!(result.records.len(), 2);
    for r in &result.records {
        assert_eq!(r.total_rows, 0);
        assert_eq!(r.overall_score, 0.0);
        assert!(!r.overall_passed);
    }
    assert_eq!(result.summary.table("empty").unwrap().average_score, 0.0);
}

#[test]
fn test_no_tables_gives_zero_summary() {
    let result = engine().run_tables_at(Vec::new(), FIXED_TS);

    assert!(result.records.is_empty());
    assert_eq!(result.summary.total_columns, 0);
    assert_eq!(result.summary.passed_columns, 0);
    assert_eq!(result.summary.failed_columns, 0);
    assert_eq!(result.summary.overall_pass_rate, 0.0);
    assert_eq!(result.summary.total_tables, 0);
    assert_eq!(result.summary.note, UNIQUENESS_NOTE);
}

#[test]
fn test_threshold_changes_verdicts_only() {
    let column = || SourceColumn::text("city", [Some("a"), Some("b"), Some("c"), None]);
    let strict = engine_with_threshold(98.0)
        .run_tables_at(vec![SourceTable::new("t", vec![column()]).unwrap()], FIXED_TS);
    let lenient = engine_with_threshold(70.0)
        .run_tables_at(vec![SourceTable::new("t", vec![column()]).unwrap()], FIXED_TS);

    assert_eq!(strict.records[0].overall_score, lenient.records[0].overall_score);
    assert!(!strict.records[0].overall_passed);
    assert!(lenient.records[0].overall_passed);
    assert_eq!(lenient.summary.threshold, 70.0);
}

// ============================================================================
// CSV Directory Runs
// ============================================================================

#[test]
fn test_fixture_tables_in_file_order() {
    let result = fixture_run();
    let tables: Vec<&str> = result
        .summary
        .tables
        .iter()
        .map(|t| t.table_name.as_str())
        .collect();

    assert_eq!(tables, vec!["customers", "payments"]);
    assert!(result.skipped_tables.is_empty());

    let columns: Vec<&str> = result
        .records
        .iter()
        .map(|r| r.column_name.as_str())
        .collect();
    assert_eq!(
        columns,
        vec![
            "customer_id",
            "customer_email",
            "signup_date",
            "age",
            "city",
            "order_id",
            "payment_value",
            "installments",
        ]
    );
}

#[test]
fn test_fixture_customer_scores() {
    let result = fixture_run();

    assert_eq!(record(&result, "customers", "customer_id").overall_score, 100.0);

    let email = record(&result, "customers", "customer_email");
    assert_eq!(email.completeness.score, 75.0);
    assert_eq!(email.conformity.score, 50.0);
    assert_eq!(email.overall_score, 70.0);

    let signup = record(&result, "customers", "signup_date");
    assert_eq!(signup.conformity.score, 75.0);
    assert_eq!(signup.overall_score, 95.0);
    assert!(!signup.overall_passed);

    let age = record(&result, "customers", "age");
    assert_eq!(age.accuracy.score, 75.0);
    assert_eq!(age.overall_score, 75.0);

    let table = result.summary.table("customers").unwrap();
    assert_eq!(table.total_columns, 5);
    assert_eq!(table.passed_columns, 1);
    assert_eq!(table.average_score, 83.0);
    assert!(!table.passed);
}

#[test]
fn test_fixture_payment_scores() {
    let result = fixture_run();

    let value = record(&result, "payments", "payment_value");
    assert_eq!(value.accuracy.score, 80.0);
    assert_eq!(value.overall_score, 96.0);

    let installments = record(&result, "payments", "installments");
    assert_eq!(installments.uniqueness.score, 20.0);
    assert!(installments.overall_passed);

    let table = result.summary.table("payments").unwrap();
    assert_eq!(table.average_score, 98.67);
    assert!(table.passed);
}

#[test]
fn test_fixture_rollup_consistency() {
    let summary = fixture_run().summary;

    assert_eq!(summary.total_columns, 8);
    assert_eq!(summary.passed_columns, 3);
    assert_eq!(summary.failed_columns, 5);
    assert_eq!(summary.overall_pass_rate, 37.5);
    assert_eq!(summary.total_tables, 2);

    let total: usize = summary.tables.iter().map(|t| t.total_columns).sum();
    let passed: usize = summary.tables.iter().map(|t| t.passed_columns).sum();
    assert_eq!(total, summary.total_columns);
    assert_eq!(passed, summary.passed_columns);
}

#[test]
fn test_unloadable_table_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        fixtures_path().join("payments_dataset.csv"),
        dir.path().join("payments_dataset.csv"),
    )
    .unwrap();
    fs::write(dir.path().join("broken_dataset.csv"), "").unwrap();

    let loader = CsvDirectoryLoader::new(dir.path());
    assert_eq!(loader.discover().unwrap().len(), 2);

    let result = engine().run(&loader).unwrap();
    assert_eq!(result.summary.total_tables, 1);
    assert_eq!(result.skipped_tables.len(), 1);
    assert_eq!(result.skipped_tables[0].table_name, "broken");
}

#[test]
fn test_skipped_table_recorded_in_summary_file() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::copy(
        fixtures_path().join("payments_dataset.csv"),
        data.path().join("payments_dataset.csv"),
    )
    .unwrap();
    fs::write(data.path().join("broken_dataset.csv"), "").unwrap();

    let config = QualityConfig::builder()
        .data_dir(data.path())
        .output_dir(out.path())
        .build()
        .unwrap();
    let loader = CsvDirectoryLoader::from_config(&config);
    let engine = QualityEngine::builder().config(config).build().unwrap();
    let result = engine.run(&loader).unwrap();
    engine.write_reports(&result, false).unwrap();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join(RUN_SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["total_tables"], 1);
    assert_eq!(summary["skipped_tables"][0]["table_name"], "broken");
    assert!(!summary["skipped_tables"][0]["reason"].as_str().unwrap().is_empty());

    let printed = serde_json::to_value(result.summary_document()).unwrap();
    assert_eq!(printed["skipped_tables"], summary["skipped_tables"]);
}

#[test]
fn test_missing_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let loader = CsvDirectoryLoader::new(dir.path().join("does-not-exist"));
    let result = engine().run(&loader).unwrap();

    assert!(result.records.is_empty());
    assert_eq!(result.summary.total_tables, 0);
}

#[test]
fn test_include_patterns_limit_tables() {
    let config = QualityConfig::builder()
        .data_dir(fixtures_path())
        .include_pattern("payments")
        .build()
        .unwrap();
    let loader = CsvDirectoryLoader::from_config(&config);
    let result = QualityEngine::builder()
        .config(config)
        .build()
        .unwrap()
        .run(&loader)
        .unwrap();

    assert_eq!(result.summary.total_tables, 1);
    assert_eq!(result.summary.tables[0].table_name, "payments");
}

// ============================================================================
// Written Artifacts
// ============================================================================

#[test]
fn test_reports_written_to_output_dir() {
    let out = tempfile::tempdir().unwrap();
    let config = QualityConfig::builder()
        .data_dir(fixtures_path())
        .output_dir(out.path())
        .build()
        .unwrap();
    let loader = CsvDirectoryLoader::from_config(&config);
    let engine = QualityEngine::builder().config(config).build().unwrap();

    let result = engine.run(&loader).unwrap();
    let written = engine.write_reports(&result, false).unwrap();
    assert_eq!(written.len(), 3);

    let detailed: Vec<ColumnQualityRecord> = serde_json::from_str(
        &fs::read_to_string(out.path().join(DETAILED_RESULTS_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(detailed.len(), result.records.len());
    for (written, original) in detailed.iter().zip(&result.records) {
        assert_eq!(written.column_name, original.column_name);
        assert_eq!(written.overall_passed, original.overall_passed);
        assert_eq!(written.conformity.valid_records, original.conformity.valid_records);
    }

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join(RUN_SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["total_columns"], 8);
    assert!(summary["tables"].is_object());
    assert_eq!(summary["tables"]["payments"]["table_name"], "payments");
    assert_eq!(summary["tables"]["customers"]["average_score"], 83.0);
    assert_eq!(summary["skipped_tables"], serde_json::json!([]));

    let written_summary: RunSummary =
        serde_json::from_str(&fs::read_to_string(out.path().join(RUN_SUMMARY_FILE)).unwrap())
            .unwrap();
    let tables: Vec<&str> = written_summary
        .tables
        .iter()
        .map(|t| t.table_name.as_str())
        .collect();
    assert_eq!(tables, vec!["customers", "payments"]);

    let csv = fs::read_to_string(out.path().join(SUMMARY_CSV_FILE)).unwrap();
    let header = csv.lines().next().unwrap();
    assert_eq!(
        header,
        "Table,Column,Data Type,Total Rows,Overall Score,Status,Completeness Score,\
         Validity Score,Uniqueness Score,Accuracy Score,Consistency Score,Conformity Score,\
         Threshold,Note"
    );
    assert_eq!(csv.lines().count(), 9);
    assert!(csv.lines().nth(1).unwrap().starts_with("customers,customer_id,"));
}

#[test]
fn test_summary_rows_projection() {
    let result = fixture_run();
    let rows = result.summary_rows();

    assert_eq!(rows.len(), result.records.len());
    let email = rows.iter().find(|r| r.column == "customer_email").unwrap();
    assert_eq!(email.status, "FAIL");
    assert_eq!(email.conformity_score, 50.0);
    assert_eq!(email.threshold, 98.0);
    assert_eq!(email.note, UNIQUENESS_NOTE);
}
