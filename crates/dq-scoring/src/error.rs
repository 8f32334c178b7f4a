//! Custom error types for the data quality engine.
//!
//! This module provides the error hierarchy using `thiserror`.
//! Configuration problems are fatal for a run, load problems are fatal only
//! for the affected table, and per-check problems never surface here at all:
//! checkers recover locally (see [`crate::quality::checks`]).
//!
//! Errors are serializable so they can be embedded in JSON output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the quality engine.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Invalid configuration provided (threshold, config file, inclusion policy).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single source table could not be loaded or parsed.
    #[error("Failed to load table '{table}': {reason}")]
    LoadFailed { table: String, reason: String },

    /// Columns of one table have different lengths.
    #[error("Table '{table}' is ragged: column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Report generation failed.
    #[error("Failed to write report: {0}")]
    ReportGenerationFailed(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::RaggedTable { .. } => "RAGGED_TABLE",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the run can continue after this error by skipping one table.
    ///
    /// Configuration errors are fatal for the whole run; everything raised
    /// while reading a single table only removes that table.
    pub fn is_table_scoped(&self) -> bool {
        match self {
            Self::LoadFailed { .. } | Self::RaggedTable { .. } | Self::Polars(_) => true,
            Self::WithContext { source, .. } => source.is_table_scoped(),
            _ => false,
        }
    }

    /// Whether this error is a configuration error.
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_config_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for QualityError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        QualityError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality engine operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}
