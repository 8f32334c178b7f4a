//! Table ingestion.
//!
//! A [`TableLoader`] lists the tables it can provide and loads each one into
//! a [`SourceTable`]. The engine only talks to this trait, so all file I/O on
//! the input side stays in this module.

mod convert;
mod csv;

pub use convert::dataframe_to_table;
pub use csv::{CsvDirectoryLoader, table_name_from_file};

use crate::error::{QualityError, Result};
use crate::types::SourceTable;
use std::path::PathBuf;

/// A table a loader knows about but has not loaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Logical table name used in every record.
    pub name: String,
    /// Backing file, for file-based loaders.
    pub path: Option<PathBuf>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Source of input tables.
pub trait TableLoader {
    /// List available tables in a deterministic order.
    fn discover(&self) -> Result<Vec<TableRef>>;

    /// Load one discovered table.
    fn load(&self, table: &TableRef) -> Result<SourceTable>;
}

/// Loader over tables already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    tables: Vec<SourceTable>,
}

impl InMemoryLoader {
    pub fn new(tables: Vec<SourceTable>) -> Self {
        Self { tables }
    }

    pub fn push(&mut self, table: SourceTable) {
        self.tables.push(table);
    }
}

impl TableLoader for InMemoryLoader {
    fn discover(&self) -> Result<Vec<TableRef>> {
        Ok(self.tables.iter().map(|t| TableRef::new(t.name())).collect())
    }

    fn load(&self, table: &TableRef) -> Result<SourceTable> {
        self.tables
            .iter()
            .find(|t| t.name() == table.name)
            .cloned()
            .ok_or_else(|| QualityError::LoadFailed {
                table: table.name.clone(),
                reason: "no such table".to_string(),
            })
    }
}
