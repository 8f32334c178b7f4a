//! Column-level Data Quality Scoring Library
//!
//! Scores every column of a set of tables along six quality dimensions and
//! rolls the verdicts up per table and per run.
//!
//! # Overview
//!
//! - **Profiling**: null, distinctness, numeric and string statistics per column
//! - **Dimension checks**: completeness, validity, uniqueness, accuracy,
//!   consistency and conformity, each a percentage with valid/invalid counts
//! - **Scoring**: overall score is the mean of five dimensions (uniqueness is
//!   reported but never scored) compared against a threshold (default 98)
//! - **Aggregation**: per-table averages and a run-wide pass rate
//! - **Reporting**: detailed JSON, summary JSON and a flattened CSV
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dq_scoring::{CsvDirectoryLoader, QualityConfig, QualityEngine};
//!
//! let config = QualityConfig::builder()
//!     .data_dir("data/kaggle-raw")
//!     .threshold(98.0)
//!     .build()?;
//!
//! let loader = CsvDirectoryLoader::from_config(&config);
//! let engine = QualityEngine::builder().config(config).build()?;
//!
//! let result = engine.run(&loader)?;
//! for table in &result.summary.tables {
//!     println!("{}: {:.2} ({})", table.table_name, table.average_score, table.passed);
//! }
//! engine.write_reports(&result, false)?;
//! ```
//!
//! # In-memory tables
//!
//! ```rust,ignore
//! use dq_scoring::{QualityEngine, SourceColumn, SourceTable};
//!
//! let table = SourceTable::new(
//!     "customers",
//!     vec![SourceColumn::text("email", [Some("a@b.com"), Some("bad"), None])],
//! )?;
//! let result = QualityEngine::builder().build()?.run_tables(vec![table]);
//! assert_eq!(result.records[0].conformity.score, 33.33);
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, DEFAULT_THRESHOLD, QualityConfig, QualityConfigBuilder};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use ingest::{CsvDirectoryLoader, InMemoryLoader, TableLoader, TableRef, dataframe_to_table};
pub use pipeline::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, QualityEngine,
    QualityEngineBuilder, QualityStage,
};
pub use profiler::ColumnProfiler;
pub use quality::{Aggregator, ColumnScorer, ConformityRule, DimensionChecker};
pub use reporting::{ProfileFindings, ReportGenerator};
pub use types::{
    Cell, ColumnKind, ColumnProfile, ColumnQualityRecord, ColumnValues, Dimension,
    DimensionResult, QualityRunResult, RunSummary, SkippedTable, SourceColumn, SourceTable,
    SummaryDocument, SummaryRow, TableSummary, UNIQUENESS_NOTE,
};
