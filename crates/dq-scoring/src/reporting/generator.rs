use super::findings::ProfileFindings;
use crate::error::{QualityError, Result};
use crate::types::{ColumnProfile, QualityRunResult, SummaryRow};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DETAILED_RESULTS_FILE: &str = "dq_results_detailed.json";
pub const RUN_SUMMARY_FILE: &str = "dq_summary.json";
pub const SUMMARY_CSV_FILE: &str = "dq_results_summary.csv";
pub const PROFILING_RESULTS_FILE: &str = "data_profiling_results.json";
pub const PROFILING_SUMMARY_FILE: &str = "data_profiling_summary.txt";

/// Paths of the quality artifacts written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityOutputPaths {
    pub detailed_json: PathBuf,
    pub summary_json: PathBuf,
    pub summary_csv: PathBuf,
}

/// Paths of the profiling artifacts written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilingOutputPaths {
    pub results_json: PathBuf,
    pub summary_text: PathBuf,
}

/// Writes run artifacts into one output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Great_Expectation"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the detailed records, the run summary and the flattened CSV.
    pub fn write_quality_outputs(&self, result: &QualityRunResult) -> Result<QualityOutputPaths> {
        fs::create_dir_all(&self.output_dir)?;

        let detailed_json = self.write_json(DETAILED_RESULTS_FILE, &result.records)?;
        let summary_json = self.write_json(RUN_SUMMARY_FILE, &result.summary_document())?;

        let summary_csv = self.output_dir.join(SUMMARY_CSV_FILE);
        let mut df = summary_frame(&result.summary_rows()).map_err(|e| {
            QualityError::ReportGenerationFailed(format!("building summary table: {}", e))
        })?;
        let mut file = File::create(&summary_csv)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)
            .map_err(|e| {
                QualityError::ReportGenerationFailed(format!(
                    "writing {}: {}",
                    summary_csv.display(),
                    e
                ))
            })?;
        info!("Report saved: {}", summary_csv.display());

        Ok(QualityOutputPaths {
            detailed_json,
            summary_json,
            summary_csv,
        })
    }

    /// Write every column profile plus the plain-text findings.
    pub fn write_profiling_outputs(
        &self,
        profiles: &[ColumnProfile],
    ) -> Result<ProfilingOutputPaths> {
        fs::create_dir_all(&self.output_dir)?;

        let results_json = self.write_json(PROFILING_RESULTS_FILE, profiles)?;

        let summary_text = self.output_dir.join(PROFILING_SUMMARY_FILE);
        let findings = ProfileFindings::from_profiles(profiles);
        fs::write(&summary_text, findings.render_text())?;
        info!("Report saved: {}", summary_text.display());

        Ok(ProfilingOutputPaths {
            results_json,
            summary_text,
        })
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.output_dir.join(name);
        let mut file = File::create(&path)?;
        file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;
        info!("Report saved: {}", path.display());
        Ok(path)
    }
}

/// Flattened rows as a `DataFrame`, columns in output order.
pub fn summary_frame(rows: &[SummaryRow]) -> PolarsResult<DataFrame> {
    let mut tables = Vec::with_capacity(rows.len());
    let mut columns = Vec::with_capacity(rows.len());
    let mut data_types = Vec::with_capacity(rows.len());
    let mut statuses = Vec::with_capacity(rows.len());
    let mut notes = Vec::with_capacity(rows.len());
    for r in rows {
        tables.push(r.table.clone());
        columns.push(r.column.clone());
        data_types.push(r.data_type.clone());
        statuses.push(r.status.clone());
        notes.push(r.note.clone());
    }
    let total_rows: Vec<u64> = rows.iter().map(|r| r.total_rows as u64).collect();
    let scores = |f: fn(&SummaryRow) -> f64| -> Vec<f64> { rows.iter().map(f).collect() };

    df!(
        "Table" => tables,
        "Column" => columns,
        "Data Type" => data_types,
        "Total Rows" => total_rows,
        "Overall Score" => scores(|r| r.overall_score),
        "Status" => statuses,
        "Completeness Score" => scores(|r| r.completeness_score),
        "Validity Score" => scores(|r| r.validity_score),
        "Uniqueness Score" => scores(|r| r.uniqueness_score),
        "Accuracy Score" => scores(|r| r.accuracy_score),
        "Consistency Score" => scores(|r| r.consistency_score),
        "Conformity Score" => scores(|r| r.conformity_score),
        "Threshold" => scores(|r| r.threshold),
        "Note" => notes,
    )
}
