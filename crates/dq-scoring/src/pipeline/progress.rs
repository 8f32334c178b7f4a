//! Progress reporting for quality runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use dq_scoring::QualityEngine;
//!
//! let result = QualityEngine::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run(&loader)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a quality run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStage {
    /// Discovering and loading source tables
    Loading,
    /// Computing column statistics
    Profiling,
    /// Running dimension checks and scoring columns
    Scoring,
    /// Rolling records up into table and run summaries
    Aggregating,
    /// Writing output artifacts
    Reporting,
    /// Run completed successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl QualityStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Tables",
            Self::Profiling => "Profiling Columns",
            Self::Scoring => "Scoring Columns",
            Self::Aggregating => "Aggregating Results",
            Self::Reporting => "Writing Reports",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run spent in this stage (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.30,
            Self::Profiling => 0.25,
            Self::Scoring => 0.30,
            Self::Aggregating => 0.05,
            Self::Reporting => 0.10,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Profiling => 0.30,
            Self::Scoring => 0.55,
            Self::Aggregating => 0.85,
            Self::Reporting => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: QualityStage,

    /// Optional sub-stage description (e.g., "Table: orders")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    pub fn new(stage: QualityStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Progress through a stage that iterates over tables.
    pub fn with_items(
        stage: QualityStage,
        sub_stage: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        let mut update = Self::new(stage, stage_progress, message);
        update.sub_stage = Some(sub_stage.into());
        update.items_processed = Some(current);
        update.items_total = Some(total);
        update
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(QualityStage::Complete, 1.0, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(QualityStage::Failed, 0.0, message)
    }
}

/// Receiver of progress updates.
///
/// Implementations must be `Send + Sync` so an engine can be shared across
/// threads.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
