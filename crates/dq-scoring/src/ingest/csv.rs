//! Directory-of-CSV loader.

use super::{TableLoader, TableRef, dataframe_to_table};
use crate::config::QualityConfig;
use crate::error::{QualityError, Result};
use crate::types::SourceTable;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads every `*.csv` file in one directory as a table.
#[derive(Debug, Clone)]
pub struct CsvDirectoryLoader {
    data_dir: PathBuf,
    include_patterns: Vec<String>,
    strip_suffixes: Vec<String>,
    infer_schema_length: Option<usize>,
}

impl CsvDirectoryLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            include_patterns: Vec::new(),
            strip_suffixes: vec!["_dataset".to_string()],
            infer_schema_length: Some(10_000),
        }
    }

    pub fn from_config(config: &QualityConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            include_patterns: config.include_patterns.clone(),
            strip_suffixes: config.strip_suffixes.clone(),
            infer_schema_length: config.infer_schema_length,
        }
    }

    /// Only load files whose name contains one of these patterns.
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.include_patterns = patterns;
        self
    }

    pub fn with_strip_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.strip_suffixes = suffixes;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn is_included(&self, file_name: &str) -> bool {
        self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| file_name.contains(p.as_str()))
    }

    fn read_frame(&self, path: &Path) -> PolarsResult<DataFrame> {
        match CsvReadOptions::default()
            .with_infer_schema_length(self.infer_schema_length)
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
        {
            Ok(df) => return Ok(df),
            Err(e) => {
                debug!("Sampled schema inference failed for {:?}: {}", path, e);
            }
        }

        // Full-file inference
        CsvReadOptions::default()
            .with_infer_schema_length(None)
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    }
}

/// Derive a table name from a CSV file name.
///
/// Drops the `.csv` extension, then the first matching suffix, e.g.
/// `orders_dataset.csv` becomes `orders`.
pub fn table_name_from_file(file_name: &str, strip_suffixes: &[String]) -> String {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    strip_suffixes
        .iter()
        .find_map(|s| stem.strip_suffix(s.as_str()))
        .filter(|name| !name.is_empty())
        .unwrap_or(stem)
        .to_string()
}

impl TableLoader for CsvDirectoryLoader {
    fn discover(&self) -> Result<Vec<TableRef>> {
        if !self.data_dir.is_dir() {
            warn!("Data directory {:?} not found, no tables to check", self.data_dir);
            return Ok(Vec::new());
        }

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || file_name.starts_with('.') || !file_name.ends_with(".csv") {
                continue;
            }
            if self.is_included(file_name) {
                files.push((file_name.to_string(), path.clone()));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        info!("Found {} CSV file(s) in {:?}", files.len(), self.data_dir);

        Ok(files
            .into_iter()
            .map(|(file_name, path)| {
                TableRef::new(table_name_from_file(&file_name, &self.strip_suffixes)).with_path(path)
            })
            .collect())
    }

    fn load(&self, table: &TableRef) -> Result<SourceTable> {
        let path = table.path.as_ref().ok_or_else(|| QualityError::LoadFailed {
            table: table.name.clone(),
            reason: "no file path".to_string(),
        })?;

        let df = self
            .read_frame(path)
            .map_err(|e| QualityError::LoadFailed {
                table: table.name.clone(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded {}: {} rows x {} columns",
            table.name,
            df.height(),
            df.width()
        );

        dataframe_to_table(&table.name, &df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn suffixes() -> Vec<String> {
        vec!["_dataset".to_string()]
    }

    #[test]
    fn test_table_name_from_file() {
        assert_eq!(table_name_from_file("olist_orders_dataset.csv", &suffixes()), "olist_orders");
        assert_eq!(table_name_from_file("products.csv", &suffixes()), "products");
        assert_eq!(table_name_from_file("_dataset.csv", &suffixes()), "_dataset");
        assert_eq!(table_name_from_file("orders_dataset.csv", &[]), "orders_dataset");
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_dataset.csv"), "x\n1\n").unwrap();
        fs::write(dir.path().join("a_dataset.csv"), "x\n1\n").unwrap();
        fs::write(dir.path().join(".hidden.csv"), "x\n1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let loader = CsvDirectoryLoader::new(dir.path());
        let names: Vec<String> = loader.discover().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_discover_include_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("orders_dataset.csv"), "x\n1\n").unwrap();
        fs::write(dir.path().join("sellers_dataset.csv"), "x\n1\n").unwrap();

        let loader = CsvDirectoryLoader::new(dir.path())
            .with_include_patterns(vec!["sellers".to_string()]);
        let refs = loader.discover().unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "sellers");
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let loader = CsvDirectoryLoader::new("/definitely/not/here");
        assert!(loader.discover().unwrap().is_empty());
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("customers_dataset.csv"),
            "customer_id,age,email\nc1,30,a@b.com\nc2,,bad\nc3,41,\n",
        )
        .unwrap();

        let loader = CsvDirectoryLoader::new(dir.path());
        let refs = loader.discover().unwrap();
        let table = loader.load(&refs[0]).unwrap();

        assert_eq!(table.name(), "customers");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.width(), 3);
        assert_eq!(table.column("age").unwrap().values().null_count(), 1);
        assert_eq!(table.column("email").unwrap().values().null_count(), 1);
    }
}
