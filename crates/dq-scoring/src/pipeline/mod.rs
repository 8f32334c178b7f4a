//! Pipeline module.
//!
//! This module provides the quality engine and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{QualityEngine, QualityEngineBuilder};
pub use progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate, QualityStage};
