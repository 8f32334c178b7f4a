//! Polars `DataFrame` to [`SourceTable`] conversion.

use crate::error::{Result, ResultExt};
use crate::types::{SourceColumn, SourceTable};
use crate::utils::scores_as_numeric;
use polars::prelude::*;

/// Convert a `DataFrame` into a [`SourceTable`].
///
/// Numeric and boolean columns become numeric (booleans as 0/1, NaN as
/// null). Every other dtype is cast to text. The polars dtype is kept as the
/// column's data-type label.
pub fn dataframe_to_table(name: &str, df: &DataFrame) -> Result<SourceTable> {
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let col_name = series.name().to_string();
        let dtype_label = series.dtype().to_string();

        let column = if scores_as_numeric(series.dtype()) {
            let floats = series
                .cast(&DataType::Float64)
                .context(format!("casting '{}' to float", col_name))?;
            let ca = floats.f64().context(format!("reading '{}'", col_name))?;
            SourceColumn::numeric(col_name.as_str(), ca.into_iter())
        } else {
            let strings = series
                .cast(&DataType::String)
                .context(format!("casting '{}' to text", col_name))?;
            let ca = strings.str().context(format!("reading '{}'", col_name))?;
            SourceColumn::text(col_name.as_str(), ca.into_iter())
        };

        columns.push(column.with_data_type(dtype_label));
    }

    SourceTable::new(name, columns)
}
