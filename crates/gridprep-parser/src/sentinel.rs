use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{RawTable, SentinelTokens};

/// Replaces every cell equal to one of `tokens` (or empty) with null, in every column
/// including the time column. Running it twice is a no-op.
pub fn normalize_sentinels(
    raw: &RawTable,
    tokens: &SentinelTokens,
) -> Result<RawTable, ParserError> {
    let df = raw.df();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let values = column.str().map_err(|source| ParserError::ColumnCast {
            column: column.name().to_string(),
            source,
        })?;
        let cleaned: Vec<Option<&str>> = values
            .into_iter()
            .map(|value| value.filter(|v| !tokens.is_missing(v)))
            .collect();
        columns.push(Series::new(column.name().clone(), cleaned).into());
    }

    let df = DataFrame::new(columns).map_err(|err| ParserError::Validation {
        reader: "SENTINEL",
        message: format!("failed to rebuild normalized table: {err}"),
    })?;
    Ok(RawTable::from_string_frame(df))
}

/// Null count per column, in column order.
pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect()
}
