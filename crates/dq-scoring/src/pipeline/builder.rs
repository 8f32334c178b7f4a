//! Quality engine and its builder.
//!
//! The engine wires the stages of a run together: load, profile, score,
//! aggregate. Scoring itself never touches the file system; reports are
//! written separately through [`QualityEngine::write_reports`].

use crate::config::{ConfigValidationError, QualityConfig};
use crate::error::Result;
use crate::ingest::TableLoader;
use crate::pipeline::progress::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, QualityStage,
};
use crate::profiler::ColumnProfiler;
use crate::quality::{Aggregator, ColumnScorer};
use crate::reporting::ReportGenerator;
use crate::types::{QualityRunResult, SkippedTable, SourceTable};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs the quality checks over a set of tables.
///
/// # Example
///
/// ```rust,ignore
/// use dq_scoring::{CsvDirectoryLoader, QualityConfig, QualityEngine};
///
/// let config = QualityConfig::builder().threshold(95.0).build()?;
/// let loader = CsvDirectoryLoader::from_config(&config);
///
/// let engine = QualityEngine::builder()
///     .config(config)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
///
/// let result = engine.run(&loader)?;
/// engine.write_reports(&result, false)?;
/// ```
pub struct QualityEngine {
    config: QualityConfig,
    scorer: ColumnScorer,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    reporter: ReportGenerator,
}

static_assertions::assert_impl_all!(QualityEngine: Send, Sync);

impl QualityEngine {
    /// Create a new engine builder.
    pub fn builder() -> QualityEngineBuilder {
        QualityEngineBuilder::default()
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Score tables already held in memory.
    pub fn run_tables(&self, tables: Vec<SourceTable>) -> QualityRunResult {
        self.run_tables_at(tables, &run_timestamp())
    }

    /// Score tables with a fixed run timestamp.
    ///
    /// Two calls with the same input and timestamp return equal results.
    pub fn run_tables_at(&self, tables: Vec<SourceTable>, timestamp: &str) -> QualityRunResult {
        self.evaluate(tables, Vec::new(), timestamp)
    }

    /// Discover, load and score every table a loader provides.
    ///
    /// Tables that fail to load are skipped and listed in
    /// [`QualityRunResult::skipped_tables`]. Only errors outside a single
    /// table (e.g. an unreadable data directory) fail the run.
    pub fn run(&self, loader: &dyn TableLoader) -> Result<QualityRunResult> {
        let start_time = Instant::now();
        match self.run_internal(loader) {
            Ok(result) => {
                info!(
                    "Quality run finished in {:.2}s: {}/{} columns passed",
                    start_time.elapsed().as_secs_f64(),
                    result.summary.passed_columns,
                    result.summary.total_columns
                );
                self.report_progress(ProgressUpdate::complete("Quality run completed"));
                Ok(result)
            }
            Err(e) => {
                error!("Quality run error: {}", e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Write the run's artifacts to the configured output directory.
    ///
    /// Does nothing when output writing is disabled. Returns the written paths.
    pub fn write_reports(
        &self,
        result: &QualityRunResult,
        include_profiling: bool,
    ) -> Result<Vec<PathBuf>> {
        if !self.config.write_outputs {
            debug!("Output writing disabled, skipping reports");
            return Ok(Vec::new());
        }

        self.report_progress(ProgressUpdate::new(
            QualityStage::Reporting,
            0.0,
            "Writing reports...",
        ));

        let quality = self.reporter.write_quality_outputs(result)?;
        let mut written = vec![quality.detailed_json, quality.summary_json, quality.summary_csv];

        if include_profiling {
            let profiling = self.reporter.write_profiling_outputs(&result.profiles)?;
            written.push(profiling.results_json);
            written.push(profiling.summary_text);
        }

        self.report_progress(ProgressUpdate::new(
            QualityStage::Reporting,
            1.0,
            format!("Wrote {} report files", written.len()),
        ));

        Ok(written)
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, loader: &dyn TableLoader) -> Result<QualityRunResult> {
        self.report_progress(ProgressUpdate::new(
            QualityStage::Loading,
            0.0,
            "Discovering tables...",
        ));

        let refs = loader.discover()?;
        info!("Discovered {} table(s)", refs.len());

        let mut tables = Vec::with_capacity(refs.len());
        let mut skipped = Vec::new();

        for (i, table_ref) in refs.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                QualityStage::Loading,
                format!("Table: {}", table_ref.name),
                i,
                refs.len(),
                format!("Loading {}", table_ref.name),
            ));

            match loader.load(table_ref) {
                Ok(table) => tables.push(table),
                Err(e) if e.is_table_scoped() => {
                    warn!("Skipping table '{}': {}", table_ref.name, e);
                    skipped.push(SkippedTable {
                        table_name: table_ref.name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.evaluate(tables, skipped, &run_timestamp()))
    }

    fn evaluate(
        &self,
        tables: Vec<SourceTable>,
        skipped_tables: Vec<SkippedTable>,
        timestamp: &str,
    ) -> QualityRunResult {
        let mut records = Vec::new();
        let mut profiles = Vec::new();
        let table_count = tables.len();

        for (i, table) in tables.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                QualityStage::Profiling,
                format!("Table: {}", table.name()),
                i,
                table_count,
                format!("Profiling {} ({} columns)", table.name(), table.width()),
            ));
            let table_profiles = ColumnProfiler::profile_table(table);

            self.report_progress(ProgressUpdate::with_items(
                QualityStage::Scoring,
                format!("Table: {}", table.name()),
                i,
                table_count,
                format!("Scoring {}", table.name()),
            ));
            for (column, profile) in table.columns().iter().zip(&table_profiles) {
                records.push(
                    self.scorer
                        .score_column(table.name(), column, profile, timestamp),
                );
            }

            profiles.extend(table_profiles);
        }

        self.report_progress(ProgressUpdate::new(
            QualityStage::Aggregating,
            0.0,
            "Aggregating results...",
        ));
        let summary = Aggregator::summarize(&records, self.scorer.threshold(), timestamp);

        QualityRunResult {
            records,
            summary,
            profiles,
            skipped_tables,
        }
    }
}

fn run_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Builder for [`QualityEngine`].
#[derive(Default)]
pub struct QualityEngineBuilder {
    config: Option<QualityConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(QualityEngineBuilder: Send);

impl QualityEngineBuilder {
    /// Set the run configuration.
    pub fn config(mut self, config: QualityConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the engine.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<QualityEngine, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(QualityEngine {
            scorer: ColumnScorer::new(config.threshold),
            reporter: ReportGenerator::new(config.output_dir.clone()),
            progress_reporter: self.progress_reporter,
            config,
        })
    }
}
