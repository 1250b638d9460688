use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use gridprep_core::trends::aggregate_trends;
use gridprep_core::{
    load, run, MissingValueStrategy, PipelineConfig, PipelineRequest, Resolution,
    ResolutionUnit,
};
use polars::prelude::*;
use tracing::{info, warn};

use crate::read_upload;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// CSV, XLS or XLSX export
    file: PathBuf,
    /// Column holding timestamps or intervals
    #[arg(long)]
    time_column: String,
    /// remove, interpolate or fill
    #[arg(long, default_value = "interpolate")]
    strategy: MissingValueStrategy,
    #[arg(long, default_value_t = 15)]
    resolution: u32,
    /// minutes or hours
    #[arg(long, default_value = "minutes")]
    unit: ResolutionUnit,
    /// Keep only days on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Keep only days on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Where to write the resampled table
    #[arg(long, default_value = "resampled.csv")]
    output: PathBuf,
    /// Where to write the trend report as JSON
    #[arg(long)]
    trends: Option<PathBuf>,
}

pub fn handle_run(args: &RunArgs, config: &PipelineConfig) -> Result<()> {
    let (bytes, name) = read_upload(&args.file)?;
    let raw = load(&bytes, &name, config).with_context(|| format!("failed to load {name}"))?;

    let request = PipelineRequest {
        time_column: args.time_column.clone(),
        strategy: args.strategy,
        resolution: Resolution::new(args.resolution, args.unit)?,
    };
    let output = run(&raw, &request, config).context("pipeline failed")?;

    if !output.coercion.is_clean() {
        warn!(
            cells = output.coercion.total(),
            "non-numeric cells were treated as missing"
        );
    }

    let (series, trends) = match (args.from, args.to) {
        (None, None) => (output.series, output.trends),
        (from, to) => {
            let start = from.unwrap_or(NaiveDate::MIN);
            let end = to.unwrap_or(NaiveDate::MAX);
            let sliced = output.series.slice_dates(start, end)?;
            let trends = aggregate_trends(&sliced)?;
            (sliced, trends)
        }
    };

    let mut frame = series.into_frame();
    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_datetime_format(Some(config.timestamp_format.clone()))
        .finish(&mut frame)
        .context("failed to write resampled table")?;
    info!(path = %args.output.display(), rows = frame.height(), "resampled table written");

    if let Some(path) = &args.trends {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &trends).context("failed to write trend report")?;
        info!(path = %path.display(), columns = trends.columns.len(), "trend report written");
    }

    Ok(())
}
