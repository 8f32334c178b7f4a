//! Column scoring: six checks in, one pass/fail verdict out.

use super::checks::DimensionChecker;
use crate::config::DEFAULT_THRESHOLD;
use crate::types::{ColumnProfile, ColumnQualityRecord, Dimension, SourceColumn};
use crate::utils::{mean_or_zero, round2};
use tracing::debug;

/// Combines dimension results into a [`ColumnQualityRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScorer {
    threshold: f64,
}

impl Default for ColumnScorer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ColumnScorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run every check on one column and score it.
    ///
    /// All records of a run share `timestamp`.
    pub fn score_column(
        &self,
        table_name: &str,
        column: &SourceColumn,
        profile: &ColumnProfile,
        timestamp: &str,
    ) -> ColumnQualityRecord {
        let check = |d| DimensionChecker::check(d, column, profile);

        let mut record = ColumnQualityRecord {
            table_name: table_name.to_string(),
            column_name: column.name().to_string(),
            data_type: column.data_type().to_string(),
            total_rows: column.len(),
            completeness: check(Dimension::Completeness),
            validity: check(Dimension::Validity),
            uniqueness: check(Dimension::Uniqueness),
            accuracy: check(Dimension::Accuracy),
            consistency: check(Dimension::Consistency),
            conformity: check(Dimension::Conformity),
            overall_score: 0.0,
            overall_passed: false,
            timestamp: timestamp.to_string(),
        };

        let scores: Vec<f64> = Dimension::SCORED
            .iter()
            .map(|d| record.dimension(*d).score)
            .collect();
        record.overall_score = overall_score(&scores);
        record.overall_passed = self.passes(record.overall_score);

        debug!(
            "Scored {}.{}: {:.2} ({})",
            table_name,
            column.name(),
            record.overall_score,
            if record.overall_passed { "PASS" } else { "FAIL" }
        );

        record
    }

    pub fn passes(&self, score: f64) -> bool {
        score >= self.threshold
    }
}

/// Unweighted mean of the scored dimensions, rounded to 2 decimals.
pub fn overall_score(scores: &[f64]) -> f64 {
    round2(mean_or_zero(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::ColumnProfiler;

    fn score(column: &SourceColumn, threshold: f64) -> ColumnQualityRecord {
        let profile = ColumnProfiler::profile_column("t", column);
        ColumnScorer::new(threshold).score_column("t", column, &profile, "2026-01-01T00:00:00")
    }

    #[test]
    fn test_clean_column_passes() {
        let col = SourceColumn::text("city", [Some("a"), Some("b"), Some("c")]);
        let record = score(&col, 98.0);
        assert_eq!(record.overall_score, 100.0);
        assert!(record.overall_passed);
    }

    #[test]
    fn test_overall_excludes_uniqueness() {
        // every dimension but uniqueness is 100
        let col = SourceColumn::text("status", [Some("ok"), Some("ok"), Some("ok"), Some("ok")]);
        let record = score(&col, 98.0);
        assert_eq!(record.uniqueness.score, 25.0);
        assert_eq!(record.overall_score, 100.0);
        assert!(record.overall_passed);
    }

    #[test]
    fn test_overall_is_mean_of_scored_dimensions() {
        let col = SourceColumn::numeric("n", [Some(1.0), Some(2.0), Some(3.0), None]);
        let record = score(&col, 98.0);

        let expected = round2(
            (record.completeness.score
                + record.validity.score
                + record.accuracy.score
                + record.consistency.score
                + record.conformity.score)
                / 5.0,
        );
        assert_eq!(record.completeness.score, 75.0);
        assert_eq!(record.overall_score, expected);
        assert_eq!(record.overall_score, 75.0);
        assert!(!record.overall_passed);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let scorer = ColumnScorer::new(75.0);
        assert!(scorer.passes(75.0));
        assert!(!scorer.passes(74.99));
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(ColumnScorer::default().threshold(), 98.0);
    }

    #[test]
    fn test_overall_score_rounding() {
        assert_eq!(overall_score(&[100.0, 100.0, 66.67, 100.0, 100.0]), 93.33);
        assert_eq!(overall_score(&[]), 0.0);
    }
}
