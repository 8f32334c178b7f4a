//! Data quality scoring module.
//!
//! This module turns profiled columns into quality verdicts:
//! - six dimension checks per column
//! - an overall score over five of them (uniqueness is reported only)
//! - table and run rollups

mod aggregator;
pub mod checks;
pub mod conformity;
mod scorer;

pub use aggregator::Aggregator;
pub use checks::DimensionChecker;
pub use conformity::{ConformityRule, Temporal, parse_temporal};
pub use scorer::{ColumnScorer, overall_score};
