//! Shared utilities for the quality engine.
//!
//! Numeric helpers used by every checker and the aggregator, plus the
//! polars dtype classification used at ingestion.

use polars::prelude::*;

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Round to 2 decimal places, ties to the even digit.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `part / total * 100`, or 0 when `total` is 0.
#[inline]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Arithmetic mean, or 0 for an empty slice.
pub fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Whether a column with this dtype is scored as numeric.
///
/// Booleans count as numeric (0/1), like in most dataframe libraries.
pub fn scores_as_numeric(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) || is_boolean_dtype(dtype)
}
