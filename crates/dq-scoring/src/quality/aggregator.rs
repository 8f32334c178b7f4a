//! Table and run rollups over an ordered record sequence.

use crate::types::{ColumnQualityRecord, RunSummary, TableSummary, UNIQUENESS_NOTE};
use crate::utils::{mean_or_zero, percentage, round2};
use std::collections::HashMap;

pub struct Aggregator;

impl Aggregator {
    /// Fold records into a [`RunSummary`].
    ///
    /// Tables appear in the order their first record appears. An empty
    /// sequence gives an all-zero summary.
    pub fn summarize(
        records: &[ColumnQualityRecord],
        threshold: f64,
        timestamp: &str,
    ) -> RunSummary {
        let tables = Self::summarize_tables(records, threshold);
        let passed_columns = records.iter().filter(|r| r.overall_passed).count();

        RunSummary {
            total_columns: records.len(),
            passed_columns,
            failed_columns: records.len() - passed_columns,
            overall_pass_rate: round2(percentage(passed_columns, records.len())),
            threshold,
            total_tables: tables.len(),
            tables,
            note: UNIQUENESS_NOTE.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    /// Per-table rollups in first-seen order.
    pub fn summarize_tables(records: &[ColumnQualityRecord], threshold: f64) -> Vec<TableSummary> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&ColumnQualityRecord>> = HashMap::new();

        for record in records {
            let name = record.table_name.as_str();
            groups
                .entry(name)
                .or_insert_with(|| {
                    order.push(name);
                    Vec::new()
                })
                .push(record);
        }

        order
            .into_iter()
            .filter_map(|name| groups.remove(name).map(|g| Self::table_summary(name, &g, threshold)))
            .collect()
    }

    fn table_summary(name: &str, records: &[&ColumnQualityRecord], threshold: f64) -> TableSummary {
        let scores: Vec<f64> = records.iter().map(|r| r.overall_score).collect();
        let passed_columns = records.iter().filter(|r| r.overall_passed).count();
        let average_score = round2(mean_or_zero(&scores));

        TableSummary {
            table_name: name.to_string(),
            total_columns: records.len(),
            passed_columns,
            failed_columns: records.len() - passed_columns,
            average_score,
            passed: average_score >= threshold,
        }
    }
}
