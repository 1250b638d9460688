use gridprep_parser::RawTable;
use polars::prelude::*;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::timestamps::TimestampFormat;
use crate::types::QualityBoundary;

/// ENTSO-E fills not-yet-published intervals with a lone dash.
pub const DEFAULT_UNAVAILABLE_TOKEN: &str = "-";

/// Scans the still string-typed table for `unavailable_token` in any column other than the
/// time column and reports the start timestamp of the first row that contains it.
pub fn detect_quality_boundary(
    raw: &RawTable,
    time_column: &str,
    unavailable_token: &str,
    format: &TimestampFormat,
) -> Result<QualityBoundary> {
    let df = raw.df();
    let times = df
        .column(time_column)
        .map_err(|_| PipelineError::MissingColumn(time_column.to_string()))?
        .str()?;

    let data_columns: Vec<&StringChunked> = df
        .get_columns()
        .iter()
        .filter(|column| column.name().as_str() != time_column)
        .map(|column| column.str())
        .collect::<PolarsResult<_>>()?;

    let first_row = (0..df.height()).find(|&row| {
        data_columns
            .iter()
            .any(|values| values.get(row) == Some(unavailable_token))
    });

    let Some(row) = first_row else {
        debug!(column = time_column, "no unavailable marker found");
        return Ok(QualityBoundary::absent());
    };

    let value = times
        .get(row)
        .ok_or(PipelineError::MissingTimestamp { row })?;
    let timestamp = format.parse_start(row, value)?;
    debug!(row, %timestamp, "quality boundary detected");

    Ok(QualityBoundary::at(row, timestamp))
}
