//! Key findings over a set of column profiles.

use crate::types::{ColumnKind, ColumnProfile};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Write;

const HIGH_NULL_PERCENT: f64 = 50.0;
const KEY_DISTINCT_PERCENT: f64 = 99.0;
const HIGH_ZERO_PERCENT: f64 = 50.0;
const LOW_CARDINALITY_MAX: usize = 20;
const CATEGORICAL_CANDIDATE_MAX: usize = 50;
const LIST_LIMIT: usize = 10;
const TOP_N: usize = 5;

/// Shape of one profiled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableShape {
    pub table_name: String,
    pub rows: usize,
    pub columns: usize,
}

/// One column called out by a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFinding {
    pub table_name: String,
    pub column_name: String,
    /// The metric the finding is ranked by.
    pub metric: f64,
    pub detail: String,
}

impl ColumnFinding {
    fn new(profile: &ColumnProfile, metric: f64, detail: String) -> Self {
        Self {
            table_name: profile.table_name.clone(),
            column_name: profile.column_name.clone(),
            metric,
            detail,
        }
    }
}

/// Summary of what the profiles reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileFindings {
    pub total_tables: usize,
    pub total_columns: usize,
    pub total_rows: usize,
    pub tables: Vec<TableShape>,
    pub high_null_columns: Vec<ColumnFinding>,
    pub potential_key_columns: Vec<ColumnFinding>,
    pub high_zero_columns: Vec<ColumnFinding>,
    pub type_distribution: Vec<(String, usize)>,
    pub high_variability_columns: Vec<ColumnFinding>,
    pub longest_string_columns: Vec<ColumnFinding>,
    pub low_cardinality_columns: Vec<ColumnFinding>,
    pub recommendations: Vec<String>,
}

impl ProfileFindings {
    pub fn from_profiles(profiles: &[ColumnProfile]) -> Self {
        let tables = table_shapes(profiles);

        let mut high_null_columns: Vec<ColumnFinding> = profiles
            .iter()
            .filter(|p| p.percent_null > HIGH_NULL_PERCENT)
            .map(|p| {
                ColumnFinding::new(
                    p,
                    p.percent_null,
                    format!("{:.2}% null ({} of {})", p.percent_null, p.null_count, p.total_count),
                )
            })
            .collect();
        sort_desc(&mut high_null_columns);
        let high_null_count = high_null_columns.len();
        high_null_columns.truncate(LIST_LIMIT);

        let potential_key_columns: Vec<ColumnFinding> = profiles
            .iter()
            .filter(|p| p.percent_distinct >= KEY_DISTINCT_PERCENT)
            .map(|p| {
                ColumnFinding::new(p, p.percent_distinct, format!("{:.2}% distinct", p.percent_distinct))
            })
            .collect();

        let mut high_zero_columns: Vec<ColumnFinding> = profiles
            .iter()
            .filter(|p| p.percent_zeros > HIGH_ZERO_PERCENT)
            .map(|p| ColumnFinding::new(p, p.percent_zeros, format!("{:.2}% zeros", p.percent_zeros)))
            .collect();
        sort_desc(&mut high_zero_columns);
        let high_zero_count = high_zero_columns.len();
        high_zero_columns.truncate(LIST_LIMIT);

        let mut high_variability_columns: Vec<ColumnFinding> = profiles
            .iter()
            .filter_map(|p| {
                let summary = p.numeric.as_ref()?;
                let std = summary.std_dev?;
                if summary.mean == 0.0 {
                    return None;
                }
                let cv = std / summary.mean.abs();
                Some(ColumnFinding::new(
                    p,
                    cv,
                    format!("CV = {:.2} (mean: {:.2}, std: {:.2})", cv, summary.mean, std),
                ))
            })
            .collect();
        sort_desc(&mut high_variability_columns);
        high_variability_columns.truncate(TOP_N);

        let mut longest_string_columns: Vec<ColumnFinding> = profiles
            .iter()
            .filter_map(|p| {
                if p.kind != ColumnKind::Text {
                    return None;
                }
                let s = p.string.as_ref()?;
                Some(ColumnFinding::new(
                    p,
                    s.mean_length,
                    format!(
                        "avg = {:.1} chars (min: {}, max: {})",
                        s.mean_length, s.min_length, s.max_length
                    ),
                ))
            })
            .collect();
        sort_desc(&mut longest_string_columns);
        longest_string_columns.truncate(TOP_N);

        let mut low_cardinality_columns: Vec<ColumnFinding> = profiles
            .iter()
            .filter(|p| p.distinct_count > 1 && p.distinct_count <= LOW_CARDINALITY_MAX)
            .map(|p| {
                ColumnFinding::new(
                    p,
                    p.distinct_count as f64,
                    format!("{} distinct values", p.distinct_count),
                )
            })
            .collect();
        low_cardinality_columns.sort_by(|a, b| a.metric.total_cmp(&b.metric));
        low_cardinality_columns.truncate(LIST_LIMIT);

        let categorical_candidates = profiles
            .iter()
            .filter(|p| p.kind == ColumnKind::Text && p.distinct_count <= CATEGORICAL_CANDIDATE_MAX)
            .count();
        let outlier_candidates = profiles
            .iter()
            .filter(|p| {
                p.numeric
                    .as_ref()
                    .and_then(|s| s.std_dev.map(|std| s.max > s.mean + 3.0 * std))
                    .unwrap_or(false)
            })
            .count();

        let mut recommendations = Vec::new();
        if high_null_count > 0 {
            recommendations.push(
                "Address high null percentages in columns - consider imputation or exclusion"
                    .to_string(),
            );
        }
        if categorical_candidates > 0 {
            recommendations.push(format!(
                "Convert {} low-cardinality text columns to a categorical type",
                categorical_candidates
            ));
        }
        if !potential_key_columns.is_empty() {
            recommendations.push(format!(
                "{} columns identified as potential primary/foreign keys - verify relationships",
                potential_key_columns.len()
            ));
        }
        if high_zero_count > 0 {
            recommendations.push(
                "Investigate columns with high zero percentages - may indicate sparse data"
                    .to_string(),
            );
        }
        if outlier_candidates > 0 {
            recommendations.push(format!(
                "{} numeric columns may contain outliers (max above mean + 3 std)",
                outlier_candidates
            ));
        }

        Self {
            total_tables: tables.len(),
            total_columns: profiles.len(),
            total_rows: tables.iter().map(|t| t.rows).sum(),
            tables,
            high_null_columns,
            potential_key_columns,
            high_zero_columns,
            type_distribution: type_distribution(profiles),
            high_variability_columns,
            longest_string_columns,
            low_cardinality_columns,
            recommendations,
        }
    }

    /// Plain-text rendering of the findings.
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(80);
        let thin = "-".repeat(80);
        let mut out = String::new();

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "DATA PROFILING SUMMARY OF FINDINGS");
        let _ = writeln!(out, "{}\n", rule);

        let _ = writeln!(out, "1. OVERALL DATASET STATISTICS\n{}", thin);
        let _ = writeln!(out, "   - Total Tables: {}", self.total_tables);
        let _ = writeln!(out, "   - Total Columns: {}", self.total_columns);
        let _ = writeln!(out, "   - Total Rows (across all tables): {}\n", self.total_rows);

        let _ = writeln!(out, "2. TABLE-LEVEL SUMMARY\n{}", thin);
        for t in &self.tables {
            let _ = writeln!(out, "   - {}: {} rows x {} columns", t.table_name, t.rows, t.columns);
        }
        out.push('\n');

        let _ = writeln!(out, "3. DATA QUALITY FINDINGS\n{}", thin);
        if self.high_null_columns.is_empty() {
            let _ = writeln!(out, "   No columns with high null percentage (>50%)");
        } else {
            let _ = writeln!(out, "   COLUMNS WITH HIGH NULL PERCENTAGE (>50%):");
            write_findings(&mut out, &self.high_null_columns);
        }
        if !self.potential_key_columns.is_empty() {
            let _ = writeln!(out, "   POTENTIAL PRIMARY KEY COLUMNS (>=99% distinct values):");
            write_findings(&mut out, &self.potential_key_columns);
        }
        if !self.high_zero_columns.is_empty() {
            let _ = writeln!(out, "   NUMERIC COLUMNS WITH HIGH ZERO PERCENTAGE (>50%):");
            write_findings(&mut out, &self.high_zero_columns);
        }
        out.push('\n');

        let _ = writeln!(out, "4. DATA TYPE ANALYSIS\n{}", thin);
        for (dtype, count) in &self.type_distribution {
            let share = crate::utils::percentage(*count, self.total_columns);
            let _ = writeln!(out, "   - {}: {} columns ({:.1}%)", dtype, count, share);
        }
        out.push('\n');

        if !self.high_variability_columns.is_empty() {
            let _ = writeln!(out, "5. NUMERIC COLUMN INSIGHTS\n{}", thin);
            let _ = writeln!(out, "   Top 5 columns with highest variability (Coefficient of Variation):");
            write_findings(&mut out, &self.high_variability_columns);
            out.push('\n');
        }

        if !self.longest_string_columns.is_empty() {
            let _ = writeln!(out, "6. STRING COLUMN INSIGHTS\n{}", thin);
            let _ = writeln!(out, "   Top 5 columns with longest average string length:");
            write_findings(&mut out, &self.longest_string_columns);
            out.push('\n');
        }

        let _ = writeln!(out, "7. CARDINALITY ANALYSIS\n{}", thin);
        if !self.low_cardinality_columns.is_empty() {
            let _ = writeln!(out, "   Low cardinality columns (<=20 distinct values):");
            write_findings(&mut out, &self.low_cardinality_columns);
        }
        out.push('\n');

        let _ = writeln!(out, "8. RECOMMENDATIONS\n{}", thin);
        if self.recommendations.is_empty() {
            let _ = writeln!(out, "   No major data quality issues detected");
        }
        for rec in &self.recommendations {
            let _ = writeln!(out, "   - {}", rec);
        }

        let _ = writeln!(out, "\n{}\nEND OF SUMMARY\n{}", rule, rule);
        out
    }
}

fn write_findings(out: &mut String, findings: &[ColumnFinding]) {
    for f in findings {
        let _ = writeln!(out, "     - {}.{}: {}", f.table_name, f.column_name, f.detail);
    }
}

fn sort_desc(findings: &mut [ColumnFinding]) {
    findings.sort_by(|a, b| b.metric.partial_cmp(&a.metric).unwrap_or(Ordering::Equal));
}

fn table_shapes(profiles: &[ColumnProfile]) -> Vec<TableShape> {
    let mut shapes: Vec<TableShape> = Vec::new();
    for p in profiles {
        match shapes.iter_mut().find(|t| t.table_name == p.table_name) {
            Some(shape) => shape.columns += 1,
            None => shapes.push(TableShape {
                table_name: p.table_name.clone(),
                rows: p.total_count,
                columns: 1,
            }),
        }
    }
    shapes
}

fn type_distribution(profiles: &[ColumnProfile]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for p in profiles {
        match counts.iter_mut().find(|(t, _)| *t == p.data_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((p.data_type.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
