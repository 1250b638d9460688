use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Table;
use gridprep_core::boundary::detect_quality_boundary;
use gridprep_core::{load, missing_counts, PipelineConfig};

use crate::read_upload;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// CSV, XLS or XLSX export
    file: PathBuf,
    /// Column holding timestamps or intervals; enables the quality boundary report
    #[arg(long)]
    time_column: Option<String>,
}

pub fn handle_inspect(args: &InspectArgs, config: &PipelineConfig) -> Result<()> {
    let (bytes, name) = read_upload(&args.file)?;
    let raw = load(&bytes, &name, config).with_context(|| format!("failed to load {name}"))?;

    println!("{name}: {} rows", raw.height());

    let mut columns = Table::new();
    columns.set_header(vec!["Column", "Missing"]);
    for (column, missing) in missing_counts(raw.df()) {
        columns.add_row(vec![column, missing.to_string()]);
    }
    println!("{columns}");

    if let Some(time_column) = &args.time_column {
        let boundary = detect_quality_boundary(
            &raw,
            time_column,
            &config.unavailable_token,
            &config.timestamp_format(),
        )
        .context("quality boundary detection failed")?;

        let mut report = Table::new();
        report.set_header(vec!["Quality boundary", "Row"]);
        match (boundary.first_unavailable, boundary.row) {
            (Some(timestamp), Some(row)) => {
                report.add_row(vec![timestamp.to_string(), row.to_string()]);
            }
            _ => {
                report.add_row(vec!["none".to_string(), "-".to_string()]);
            }
        }
        println!("{report}");
    }

    Ok(())
}
