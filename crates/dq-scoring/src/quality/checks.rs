//! The six per-column dimension checks.
//!
//! Every check is a pure function of the column and its profile. Scores are
//! percentages of the column's row count, rounded to 2 decimals.

use super::conformity;
use crate::types::{ColumnProfile, ColumnValues, Dimension, DimensionResult, SourceColumn};

/// Dimension checks over one profiled column.
pub struct DimensionChecker;

impl DimensionChecker {
    /// Run one dimension check.
    pub fn check(
        dimension: Dimension,
        column: &SourceColumn,
        profile: &ColumnProfile,
    ) -> DimensionResult {
        match dimension {
            Dimension::Completeness => Self::completeness(column),
            Dimension::Validity => Self::validity(column),
            Dimension::Uniqueness => Self::uniqueness(column, profile),
            Dimension::Accuracy => Self::accuracy(column, profile),
            Dimension::Consistency => Self::consistency(column),
            Dimension::Conformity => Self::conformity(column),
        }
    }

    /// Non-null share of the column.
    pub fn completeness(column: &SourceColumn) -> DimensionResult {
        let values = column.values();
        DimensionResult::from_counts(values.non_null_count(), values.len(), "non-null")
    }

    /// Numeric values must be finite; text values must not be blank.
    pub fn validity(column: &SourceColumn) -> DimensionResult {
        let values = column.values();
        let valid = match values {
            ColumnValues::Numeric(v) => v.iter().flatten().filter(|x| x.is_finite()).count(),
            ColumnValues::Text(v) => v.iter().flatten().filter(|s| !s.trim().is_empty()).count(),
        };
        DimensionResult::from_counts(valid, values.len(), "valid")
    }

    /// Distinct non-null values over the row count. Reported, never scored.
    pub fn uniqueness(column: &SourceColumn, profile: &ColumnProfile) -> DimensionResult {
        DimensionResult::from_counts(profile.distinct_count, column.len(), "unique")
    }

    /// Numeric values inside the Tukey fence `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`.
    ///
    /// Text columns have no notion of accuracy beyond presence.
    pub fn accuracy(column: &SourceColumn, profile: &ColumnProfile) -> DimensionResult {
        let values = column.values();
        let accurate = match (values, profile.numeric.as_ref()) {
            (ColumnValues::Numeric(v), Some(summary)) => {
                let iqr = summary.q3 - summary.q1;
                let lower = summary.q1 - 1.5 * iqr;
                let upper = summary.q3 + 1.5 * iqr;
                v.iter()
                    .flatten()
                    .filter(|x| **x >= lower && **x <= upper)
                    .count()
            }
            (ColumnValues::Numeric(_), None) => 0,
            (ColumnValues::Text(_), _) => values.non_null_count(),
        };
        DimensionResult::from_counts(accurate, values.len(), "accurate")
    }

    /// Non-null share, same as completeness.
    pub fn consistency(column: &SourceColumn) -> DimensionResult {
        let values = column.values();
        DimensionResult::from_counts(values.non_null_count(), values.len(), "consistent")
    }

    /// Values matching the format implied by the column name.
    pub fn conformity(column: &SourceColumn) -> DimensionResult {
        conformity::check(column)
    }
}
