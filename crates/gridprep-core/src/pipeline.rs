use gridprep_parser::{load_table, RawTable};
use serde::Serialize;
use tracing::{info, warn};

use crate::boundary::detect_quality_boundary;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::missing::{resolve_missing_values, CoercionReport};
use crate::resample::resample;
use crate::series::TimeSeriesTable;
use crate::timestamps::parse_time_column;
use crate::trends::{aggregate_trends, TrendReport};
use crate::types::{MissingValueStrategy, QualityBoundary, Resolution};

/// Parameters chosen per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRequest {
    pub time_column: String,
    pub strategy: MissingValueStrategy,
    pub resolution: Resolution,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub boundary: QualityBoundary,
    pub coercion: CoercionReport,
    pub series: TimeSeriesTable,
    pub trends: TrendReport,
}

pub fn load(bytes: &[u8], file_name: &str, config: &PipelineConfig) -> Result<RawTable> {
    let options = config.load_options()?;
    let raw = load_table(bytes, file_name, &options)?;
    info!(
        file = file_name,
        rows = raw.height(),
        columns = raw.df().width(),
        "table loaded"
    );
    Ok(raw)
}

/// Boundary detection, missing-value resolution, time parsing, resampling and trend
/// aggregation over one uploaded table.
pub fn run(
    raw: &RawTable,
    request: &PipelineRequest,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let time_column = request.time_column.as_str();
    if !raw.has_column(time_column) {
        return Err(PipelineError::MissingColumn(time_column.to_string()));
    }

    let time_nulls = raw.df().column(time_column)?.null_count();
    if time_nulls > 0 {
        warn!(
            column = time_column,
            nulls = time_nulls,
            "time column contains missing values"
        );
    }

    let format = config.timestamp_format();
    let boundary =
        detect_quality_boundary(raw, time_column, &config.unavailable_token, &format)?;

    let resolved = resolve_missing_values(
        raw.df(),
        time_column,
        request.strategy,
        config.coercion_policy(),
    )?;

    let series = parse_time_column(&resolved.frame, time_column, &format)?;
    let series = resample(&series, request.resolution, &boundary)?;
    let trends = aggregate_trends(&series)?;

    info!(
        strategy = %request.strategy,
        resolution = %request.resolution,
        boundary = ?boundary.first_unavailable,
        coerced = resolved.coercion.total(),
        rows = series.len(),
        "pipeline finished"
    );

    Ok(PipelineOutput {
        boundary,
        coercion: resolved.coercion,
        series,
        trends,
    })
}
