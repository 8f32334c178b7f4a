use crate::error::{QualityError, Result};
use crate::utils::{percentage, round2};
use serde::{Deserialize, Serialize};

/// Fixed note carried by every flattened row and run summary.
pub const UNIQUENESS_NOTE: &str = "Overall score excludes Uniqueness";

// ============================================================================
// Input model
// ============================================================================

/// A single cell handed over by a loader.
///
/// Serializes untagged: `null`, a JSON number or a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Numeric(f64),
    Text(String),
}

impl Cell {
    /// Whether the cell is a null marker. A numeric NaN counts as null.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Numeric(v) => v.is_nan(),
            Cell::Text(_) => false,
        }
    }

    /// Textual representation used for length statistics and pattern checks.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Numeric(v) if v.is_nan() => None,
            Cell::Numeric(v) => Some(format_number(*v)),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

/// Render a float the way a spreadsheet would: integral values without a
/// trailing `.0`.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Column kind, decided once when the column is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

/// Column values, tagged by kind. `None` is the null marker.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn non_null_count(&self) -> usize {
        match self {
            Self::Numeric(v) => v.iter().filter(|x| x.is_some()).count(),
            Self::Text(v) => v.iter().filter(|x| x.is_some()).count(),
        }
    }

    pub fn null_count(&self) -> usize {
        self.len() - self.non_null_count()
    }

    /// Textual representation of every non-null value, in order.
    pub fn rendered(&self) -> Vec<String> {
        match self {
            Self::Numeric(v) => v.iter().flatten().map(|x| format_number(*x)).collect(),
            Self::Text(v) => v.iter().flatten().cloned().collect(),
        }
    }
}

/// One named input column.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceColumn {
    name: String,
    data_type: String,
    values: ColumnValues,
}

impl SourceColumn {
    /// Build a numeric column. NaN values are normalised to null.
    pub fn numeric<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            data_type: ColumnKind::Numeric.as_str().to_string(),
            values: ColumnValues::Numeric(values),
        }
    }

    /// Build a text column.
    pub fn text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self {
            name: name.into(),
            data_type: ColumnKind::Text.as_str().to_string(),
            values: ColumnValues::Text(values),
        }
    }

    /// Build a column from raw cells, inferring its kind.
    ///
    /// The column is numeric when it holds at least one non-null cell and
    /// every non-null cell is numeric. Otherwise it is text, with numeric
    /// cells rendered to their textual form.
    pub fn from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let mut saw_value = false;
        let mut all_numeric = true;
        for cell in cells.iter().filter(|c| !c.is_null()) {
            saw_value = true;
            if !matches!(cell, Cell::Numeric(_)) {
                all_numeric = false;
                break;
            }
        }

        if saw_value && all_numeric {
            let values = cells.into_iter().map(|c| match c {
                Cell::Numeric(v) => Some(v),
                _ => None,
            });
            Self::numeric(name, values)
        } else {
            let values = cells.iter().map(Cell::render).collect::<Vec<_>>();
            Self::text(name, values)
        }
    }

    /// Replace the data-type label (e.g. with the loader's source dtype).
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One named input table: ordered columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    name: String,
    columns: Vec<SourceColumn>,
    row_count: usize,
}

impl SourceTable {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(name: impl Into<String>, columns: Vec<SourceColumn>) -> Result<Self> {
        let name = name.into();
        let row_count = columns.first().map(SourceColumn::len).unwrap_or(0);

        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(QualityError::RaggedTable {
                table: name,
                column: bad.name().to_string(),
                expected: row_count,
                actual: bad.len(),
            });
        }

        Ok(Self {
            name,
            columns,
            row_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&SourceColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

// ============================================================================
// Profile types
// ============================================================================

/// Descriptive statistics over the non-null values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; absent with fewer than two values.
    pub std_dev: Option<f64>,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Character-length statistics over the non-null values of a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringSummary {
    pub min_length: usize,
    pub max_length: usize,
    pub mean_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: Cell,
    pub frequency: usize,
}

/// Descriptive profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub kind: ColumnKind,
    pub total_count: usize,
    pub null_count: usize,
    pub not_null_count: usize,
    pub percent_null: f64,
    /// Distinct non-null values. Nulls are never counted as a value.
    pub distinct_count: usize,
    /// Values occurring exactly once.
    pub unique_count: usize,
    pub not_unique_count: usize,
    pub percent_distinct: f64,
    pub zero_count: usize,
    pub percent_zeros: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<StringSummary>,
    pub most_frequent_value: Option<Cell>,
    pub highest_frequency: usize,
    pub lowest_frequency: usize,
    pub top_values: Vec<FrequencyEntry>,
}

// ============================================================================
// Quality records
// ============================================================================

/// The six quality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Completeness,
    Validity,
    Uniqueness,
    Accuracy,
    Consistency,
    Conformity,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Completeness,
        Dimension::Validity,
        Dimension::Uniqueness,
        Dimension::Accuracy,
        Dimension::Consistency,
        Dimension::Conformity,
    ];

    /// Dimensions that feed the overall score. Uniqueness is left out.
    pub const SCORED: [Dimension; 5] = [
        Dimension::Completeness,
        Dimension::Validity,
        Dimension::Accuracy,
        Dimension::Consistency,
        Dimension::Conformity,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Completeness => "Completeness",
            Self::Validity => "Validity",
            Self::Uniqueness => "Uniqueness",
            Self::Accuracy => "Accuracy",
            Self::Consistency => "Consistency",
            Self::Conformity => "Conformity",
        }
    }
}

/// Outcome of one dimension check on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    /// Percentage in [0, 100], rounded to 2 decimals.
    pub score: f64,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub details: String,
}

impl DimensionResult {
    /// Build a result from a valid count. `label` completes the details
    /// fraction, e.g. `"950/1000 non-null"`.
    pub fn from_counts(valid: usize, total: usize, label: &str) -> Self {
        let valid = valid.min(total);
        Self {
            score: round2(percentage(valid, total)),
            valid_records: valid,
            invalid_records: total - valid,
            details: format!("{}/{} {}", valid, total, label),
        }
    }

    /// Append a note to the details string.
    pub fn with_note(mut self, note: impl AsRef<str>) -> Self {
        self.details = format!("{} ({})", self.details, note.as_ref());
        self
    }

    pub fn total_records(&self) -> usize {
        self.valid_records + self.invalid_records
    }
}

/// Quality verdict for one (table, column) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQualityRecord {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub total_rows: usize,
    pub completeness: DimensionResult,
    pub validity: DimensionResult,
    /// Tracked for every column but never part of the overall score.
    pub uniqueness: DimensionResult,
    pub accuracy: DimensionResult,
    pub consistency: DimensionResult,
    pub conformity: DimensionResult,
    pub overall_score: f64,
    pub overall_passed: bool,
    pub timestamp: String,
}

impl ColumnQualityRecord {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionResult {
        match dimension {
            Dimension::Completeness => &self.completeness,
            Dimension::Validity => &self.validity,
            Dimension::Uniqueness => &self.uniqueness,
            Dimension::Accuracy => &self.accuracy,
            Dimension::Consistency => &self.consistency,
            Dimension::Conformity => &self.conformity,
        }
    }
}

/// Rollup of the records sharing one table name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table_name: String,
    pub total_columns: usize,
    pub passed_columns: usize,
    pub failed_columns: usize,
    pub average_score: f64,
    pub passed: bool,
}

/// Rollup of every record in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_columns: usize,
    pub passed_columns: usize,
    pub failed_columns: usize,
    pub overall_pass_rate: f64,
    pub threshold: f64,
    pub total_tables: usize,
    /// Per-table rollups in first-seen order, serialized as an object keyed
    /// by table name.
    #[serde(with = "table_map")]
    pub tables: Vec<TableSummary>,
    pub note: String,
    pub timestamp: String,
}

impl RunSummary {
    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|t| t.table_name == name)
    }
}

mod table_map {
    use super::TableSummary;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(tables: &[TableSummary], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(tables.len()))?;
        for table in tables {
            map.serialize_entry(&table.table_name, table)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<TableSummary>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TablesVisitor;

        impl<'de> Visitor<'de> for TablesVisitor {
            type Value = Vec<TableSummary>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of table name to table summary")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut tables = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_, table)) = map.next_entry::<String, TableSummary>()? {
                    tables.push(table);
                }
                Ok(tables)
            }
        }

        deserializer.deserialize_map(TablesVisitor)
    }
}

/// The run summary as written to disk, with the tables that could not be loaded.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryDocument<'a> {
    #[serde(flatten)]
    pub summary: &'a RunSummary,
    pub skipped_tables: &'a [SkippedTable],
}

/// Flattened, spreadsheet-friendly projection of a [`ColumnQualityRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Table")]
    pub table: String,
    #[serde(rename = "Column")]
    pub column: String,
    #[serde(rename = "Data Type")]
    pub data_type: String,
    #[serde(rename = "Total Rows")]
    pub total_rows: usize,
    #[serde(rename = "Overall Score")]
    pub overall_score: f64,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Completeness Score")]
    pub completeness_score: f64,
    #[serde(rename = "Validity Score")]
    pub validity_score: f64,
    #[serde(rename = "Uniqueness Score")]
    pub uniqueness_score: f64,
    #[serde(rename = "Accuracy Score")]
    pub accuracy_score: f64,
    #[serde(rename = "Consistency Score")]
    pub consistency_score: f64,
    #[serde(rename = "Conformity Score")]
    pub conformity_score: f64,
    #[serde(rename = "Threshold")]
    pub threshold: f64,
    #[serde(rename = "Note")]
    pub note: String,
}

impl SummaryRow {
    pub fn from_record(record: &ColumnQualityRecord, threshold: f64) -> Self {
        Self {
            table: record.table_name.clone(),
            column: record.column_name.clone(),
            data_type: record.data_type.clone(),
            total_rows: record.total_rows,
            overall_score: record.overall_score,
            status: if record.overall_passed { "PASS" } else { "FAIL" }.to_string(),
            completeness_score: record.completeness.score,
            validity_score: record.validity.score,
            uniqueness_score: record.uniqueness.score,
            accuracy_score: record.accuracy.score,
            consistency_score: record.consistency.score,
            conformity_score: record.conformity.score,
            threshold,
            note: UNIQUENESS_NOTE.to_string(),
        }
    }
}

/// A table the run could not include, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTable {
    pub table_name: String,
    pub reason: String,
}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityRunResult {
    /// Detailed records in table-then-column input order.
    pub records: Vec<ColumnQualityRecord>,
    pub summary: RunSummary,
    /// Column profiles in the same order as `records`.
    pub profiles: Vec<ColumnProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped_tables: Vec<SkippedTable>,
}

impl QualityRunResult {
    /// Run summary plus skipped tables, the shape of the summary artifact.
    pub fn summary_document(&self) -> SummaryDocument<'_> {
        SummaryDocument {
            summary: &self.summary,
            skipped_tables: &self.skipped_tables,
        }
    }

    /// Flattened projection of the records, one row per column.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.records
            .iter()
            .map(|r| SummaryRow::from_record(r, self.summary.threshold))
            .collect()
    }
}
