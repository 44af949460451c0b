//! Conversion of result tables into `polars` data frames.

use polars::prelude::{Column, DataFrame};

use crate::{GridmixError, Table};

/// Column holding row timestamps as Unix milliseconds.
pub const TIME_COLUMN: &str = "start_time";

/// Convert a table into a data frame with a leading millisecond timestamp
/// column followed by one `f64` column per table column.
///
/// # Errors
/// Returns `GridmixError::Data` if polars rejects the column set (e.g. a
/// table column named like the timestamp column).
pub fn to_dataframe(table: &Table) -> Result<DataFrame, GridmixError> {
    let mut columns = Vec::with_capacity(table.columns.len() + 1);
    let millis: Vec<i64> = table.index.iter().map(chrono::DateTime::timestamp_millis).collect();
    columns.push(Column::new(TIME_COLUMN.into(), millis));
    for (j, name) in table.columns.iter().enumerate() {
        let values: Vec<f64> = table.rows.iter().map(|r| r[j]).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    DataFrame::new(columns).map_err(|e| GridmixError::Data(format!("dataframe: {e}")))
}
