//! Statistical analysis functions for column profiling.

use crate::types::{NumericSummary, StringSummary};

/// Summarise the non-null values of a numeric column.
///
/// Returns `None` when there is nothing to summarise.
pub(crate) fn numeric_summary(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q2 = quantile_sorted(&sorted, 0.50)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;

    Some(NumericSummary {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean,
        median: q2,
        std_dev: calculate_std(values),
        q1,
        q2,
        q3,
    })
}

/// Sample standard deviation (n - 1 denominator).
///
/// Undefined for fewer than two values.
pub(crate) fn calculate_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

    Some(variance.sqrt())
}

/// Quantile of an ascending slice using linear interpolation between ranks.
///
/// The rank is `q * (n - 1)`; a fractional rank interpolates between its
/// two neighbours.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if lower == upper {
        return Some(sorted[lower]);
    }

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Character-length statistics for text values.
pub(crate) fn string_summary<'a, I>(values: I) -> Option<StringSummary>
where
    I: IntoIterator<Item = &'a str>,
{
    let lengths: Vec<usize> = values.into_iter().map(|s| s.chars().count()).collect();
    let min_length = *lengths.iter().min()?;
    let max_length = *lengths.iter().max()?;
    let mean_length = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

    Some(StringSummary {
        min_length,
        max_length,
        mean_length,
    })
}

/// Count of values exactly equal to zero. Nulls never count.
pub(crate) fn zero_count(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| **v == Some(0.0)).count()
}
