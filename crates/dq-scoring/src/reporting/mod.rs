//! Report generation module.
//!
//! Writes the artifacts of a run into the configured output directory:
//! - `dq_results_detailed.json`: every column record
//! - `dq_summary.json`: the run summary
//! - `dq_results_summary.csv`: one flattened row per column
//! - `data_profiling_results.json` and `data_profiling_summary.txt` when
//!   profiling output is requested
//!
//! # Example
//!
//! ```rust,ignore
//! use dq_scoring::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new(PathBuf::from("Great_Expectation"));
//! let paths = generator.write_quality_outputs(&result)?;
//! println!("{}", paths.summary_csv.display());
//! ```

mod findings;
mod generator;

pub use findings::{ColumnFinding, ProfileFindings, TableShape};
pub use generator::{
    DETAILED_RESULTS_FILE, PROFILING_RESULTS_FILE, PROFILING_SUMMARY_FILE, ProfilingOutputPaths,
    QualityOutputPaths, RUN_SUMMARY_FILE, ReportGenerator, SUMMARY_CSV_FILE, summary_frame,
};
