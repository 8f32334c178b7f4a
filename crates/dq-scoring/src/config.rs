//! Configuration types for the data quality engine.
//!
//! This module provides configuration options using the builder pattern.
//! The configuration is an explicit value handed to the engine; nothing in
//! the scoring path reads environment variables or global state.

use crate::error::{QualityError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default pass/fail threshold, in percent.
pub const DEFAULT_THRESHOLD: f64 = 98.0;

/// Configuration for a quality run.
///
/// Use [`QualityConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use dq_scoring::config::QualityConfig;
///
/// let config = QualityConfig::builder()
///     .threshold(95.0)
///     .data_dir("data/raw")
///     .include_pattern("olist_")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum overall score (percent) for a column or table to pass.
    /// Default: 98.0
    pub threshold: f64,

    /// Directory scanned for source CSV files.
    /// Default: "data/kaggle-raw"
    pub data_dir: PathBuf,

    /// Only files whose name contains one of these substrings are loaded.
    /// An empty list loads every CSV file.
    /// Default: empty
    pub include_patterns: Vec<String>,

    /// Suffixes stripped from the file stem to form the table name.
    /// Default: ["_dataset"]
    pub strip_suffixes: Vec<String>,

    /// Directory receiving result files.
    /// Default: "Great_Expectation"
    pub output_dir: PathBuf,

    /// Whether result files are written to disk.
    /// Default: true
    pub write_outputs: bool,

    /// Rows used by the CSV reader to infer column types.
    /// `None` scans the whole file.
    /// Default: Some(10_000)
    pub infer_schema_length: Option<usize>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            data_dir: PathBuf::from("data/kaggle-raw"),
            include_patterns: Vec::new(),
            strip_suffixes: vec!["_dataset".to_string()],
            output_dir: PathBuf::from("Great_Expectation"),
            write_outputs: true,
            infer_schema_length: Some(10_000),
        }
    }
}

impl QualityConfig {
    /// Create a new configuration builder.
    pub fn builder() -> QualityConfigBuilder {
        QualityConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their defaults. The result is validated, so a
    /// malformed file or an out-of-range threshold fails here, before any
    /// table is touched.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QualityError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: QualityConfig = serde_json::from_str(&content).map_err(|e| {
            QualityError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(ConfigValidationError::InvalidThreshold(self.threshold));
        }

        if self.include_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyPattern("include_patterns"));
        }

        if self.strip_suffixes.iter().any(|s| s.is_empty()) {
            return Err(ConfigValidationError::EmptyPattern("strip_suffixes"));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold: {0} (must be a finite percentage between 0 and 100)")]
    InvalidThreshold(f64),

    #[error("Empty entry in '{0}'")]
    EmptyPattern(&'static str),

    #[error("Invalid schema inference length: 0 (use None to scan the whole file)")]
    InvalidSchemaLength,
}

/// Builder for [`QualityConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct QualityConfigBuilder {
    threshold: Option<f64>,
    data_dir: Option<PathBuf>,
    include_patterns: Vec<String>,
    strip_suffixes: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    write_outputs: Option<bool>,
    infer_schema_length: Option<Option<usize>>,
}

impl QualityConfigBuilder {
    /// Set the pass/fail threshold in percent (0 - 100).
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the directory scanned for source CSV files.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Add a file-name substring that selects tables to load.
    pub fn include_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Replace the table-name suffixes stripped from file stems.
    pub fn strip_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_suffixes = Some(suffixes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the output directory for result files.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Enable or disable writing result files.
    pub fn write_outputs(mut self, write: bool) -> Self {
        self.write_outputs = Some(write);
        self
    }

    /// Set the number of rows used for CSV schema inference.
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `QualityConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<QualityConfig, ConfigValidationError> {
        let defaults = QualityConfig::default();
        let config = QualityConfig {
            threshold: self.threshold.unwrap_or(defaults.threshold),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            include_patterns: self.include_patterns,
            strip_suffixes: self.strip_suffixes.unwrap_or(defaults.strip_suffixes),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            write_outputs: self.write_outputs.unwrap_or(defaults.write_outputs),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QualityConfig::default();
        assert_eq!(config.threshold, 98.0);
        assert_eq!(config.strip_suffixes, vec!["_dataset".to_string()]);
        assert!(config.include_patterns.is_empty());
        assert!(config.write_outputs);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = QualityConfig::builder()
            .threshold(90.0)
            .data_dir("raw")
            .include_pattern("olist_")
            .include_pattern("product_category")
            .write_outputs(false)
            .build()
            .unwrap();

        assert_eq!(config.threshold, 90.0);
        assert_eq!(config.data_dir, PathBuf::from("raw"));
        assert_eq!(config.include_patterns.len(), 2);
        assert!(!config.write_outputs);
    }

    #[test]
    fn test_validation_invalid_threshold() {
        for bad in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
            let result = QualityConfig::builder().threshold(bad).build();
            assert!(matches!(
                result,
                Err(ConfigValidationError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn test_validation_boundaries_accepted() {
        assert!(QualityConfig::builder().threshold(0.0).build().is_ok());
        assert!(QualityConfig::builder().threshold(100.0).build().is_ok());
    }

    #[test]
    fn test_validation_empty_pattern() {
        let result = QualityConfig::builder().include_pattern("  ").build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::EmptyPattern("include_patterns"))
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "threshold": 95.5, "include_patterns": ["olist_"] }"#;
        let config: QualityConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.threshold, 95.5);
        assert_eq!(config.include_patterns, vec!["olist_".to_string()]);
        assert_eq!(config.output_dir, PathBuf::from("Great_Expectation"));
    }

    #[test]
    fn test_from_json_file_rejects_bad_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dq_config.json");
        std::fs::write(&path, r#"{ "threshold": 250 }"#).unwrap();

        let err = QualityConfig::from_json_file(&path).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_from_json_file_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dq_config.json");
        std::fs::write(&path, "threshold: 98").unwrap();

        let err = QualityConfig::from_json_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = QualityConfig::from_json_file("/nonexistent/dq_config.json").unwrap_err();
        assert!(err.is_config_error());
    }
}
