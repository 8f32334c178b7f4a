//! Column profiling module.
//!
//! This module computes the descriptive statistics every checker builds on:
//! - Null analysis
//! - Distinctness (nulls are never counted as a distinct value)
//! - Numeric summary with interpolated quartiles
//! - String length summary
//! - Frequency table

mod frequency;
mod statistics;

use crate::types::{ColumnProfile, ColumnValues, SourceColumn, SourceTable, format_number};
use crate::utils::percentage;
use tracing::debug;

pub use frequency::TOP_VALUES;

/// Profiler computing [`ColumnProfile`]s. Never mutates its input.
pub struct ColumnProfiler;

impl ColumnProfiler {
    /// Profile every column of a table, in column order.
    pub fn profile_table(table: &SourceTable) -> Vec<ColumnProfile> {
        table
            .columns()
            .iter()
            .map(|col| Self::profile_column(table.name(), col))
            .collect()
    }

    /// Profile a single column.
    ///
    /// Empty and all-null columns produce zero percentages and no summaries.
    pub fn profile_column(table_name: &str, column: &SourceColumn) -> ColumnProfile {
        let values = column.values();
        let total_count = values.len();
        let not_null_count = values.non_null_count();
        let null_count = total_count - not_null_count;

        let counts = frequency::value_counts(values);
        let distinct_count = counts.len();
        let unique_count = counts.iter().filter(|e| e.frequency == 1).count();

        let (numeric, string, zero_count) = match values {
            ColumnValues::Numeric(v) => {
                let present: Vec<f64> = v.iter().flatten().copied().collect();
                // Lengths of the rendered numbers
                let rendered: Vec<String> = present.iter().map(|x| format_number(*x)).collect();
                (
                    statistics::numeric_summary(&present),
                    statistics::string_summary(rendered.iter().map(String::as_str)),
                    statistics::zero_count(v),
                )
            }
            ColumnValues::Text(v) => (
                None,
                statistics::string_summary(v.iter().flatten().map(String::as_str)),
                0,
            ),
        };

        let most_frequent_value = counts.first().map(|e| e.value.clone());
        let highest_frequency = counts.first().map(|e| e.frequency).unwrap_or(0);
        let lowest_frequency = counts.iter().map(|e| e.frequency).min().unwrap_or(0);
        let top_values = counts.into_iter().take(TOP_VALUES).collect();

        debug!(
            "Profiled {}.{}: {} rows, {} null, {} distinct",
            table_name,
            column.name(),
            total_count,
            null_count,
            distinct_count
        );

        ColumnProfile {
            table_name: table_name.to_string(),
            column_name: column.name().to_string(),
            data_type: column.data_type().to_string(),
            kind: column.kind(),
            total_count,
            null_count,
            not_null_count,
            percent_null: percentage(null_count, total_count),
            distinct_count,
            unique_count,
            not_unique_count: total_count - unique_count,
            percent_distinct: percentage(distinct_count, total_count),
            zero_count,
            percent_zeros: percentage(zero_count, total_count),
            numeric,
            string,
            most_frequent_value,
            highest_frequency,
            lowest_frequency,
            top_values,
        }
    }
}
