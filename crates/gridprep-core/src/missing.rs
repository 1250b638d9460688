use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::numeric::coerce_numeric;
use crate::types::{CoercionPolicy, MissingValueStrategy};

/// Per-column count of present cells that were not numbers and became missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoercionReport {
    pub nulled: Vec<(String, usize)>,
}

impl CoercionReport {
    pub fn total(&self) -> usize {
        self.nulled.iter().map(|(_, count)| count).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub frame: DataFrame,
    pub coercion: CoercionReport,
}

/// Coerces every column except `time_column` to floats and fills or drops gaps with
/// `strategy`. The time column is carried through untouched, aligned with the kept rows.
pub fn resolve_missing_values(
    df: &DataFrame,
    time_column: &str,
    strategy: MissingValueStrategy,
    policy: CoercionPolicy,
) -> Result<Resolved> {
    if df.column(time_column).is_err() {
        return Err(PipelineError::MissingColumn(time_column.to_string()));
    }

    let mut report = CoercionReport::default();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    let mut numeric: Vec<Vec<Option<f64>>> = Vec::new();

    for column in df.get_columns() {
        if column.name().as_str() == time_column {
            columns.push(column.clone());
            continue;
        }

        let coerced = coerce_numeric(column, policy)?;
        if coerced.nulled > 0 {
            warn!(
                column = column.name().as_str(),
                nulled = coerced.nulled,
                "non-numeric cells coerced to missing"
            );
            report
                .nulled
                .push((column.name().to_string(), coerced.nulled));
        }

        let filled = match strategy {
            MissingValueStrategy::Remove => coerced.values,
            MissingValueStrategy::Interpolate => interpolate_linear(&coerced.values),
            MissingValueStrategy::BackwardForwardFill => {
                backward_fill(&forward_fill(&coerced.values))
            }
        };
        columns.push(Series::new(column.name().clone(), filled.clone()).into());
        numeric.push(filled);
    }

    let mut frame = DataFrame::new(columns)?;

    if strategy == MissingValueStrategy::Remove {
        let keep: Vec<bool> = (0..frame.height())
            .map(|row| numeric.iter().all(|values| values[row].is_some()))
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        frame = frame.filter(&mask)?;
    }

    debug!(
        %strategy,
        rows_in = df.height(),
        rows_out = frame.height(),
        "missing values resolved"
    );

    Ok(Resolved {
        frame,
        coercion: report,
    })
}

/// Linear interpolation by row position. Gaps without a value on both sides stay missing.
pub fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let mut previous: Option<(usize, f64)> = None;

    for (idx, value) in values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        if let Some((start, start_value)) = previous {
            let span = (idx - start) as f64;
            for gap in start + 1..idx {
                let weight = (gap - start) as f64 / span;
                out[gap] = Some(start_value + (value - start_value) * weight);
            }
        }
        previous = Some((idx, value));
    }

    out
}

pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|value| {
            if value.is_some() {
                last = *value;
            }
            last
        })
        .collect()
}

pub fn backward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut next = None;
    let mut out: Vec<Option<f64>> = values
        .iter()
        .rev()
        .map(|value| {
            if value.is_some() {
                next = *value;
            }
            next
        })
        .collect();
    out.reverse();
    out
}
