use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::series::TimeSeriesTable;
use crate::timestamps::naive_to_micros;
use crate::types::{QualityBoundary, Resolution};

const MICROS_PER_MINUTE: i64 = 60 * 1_000_000;

/// Puts `table` on a uniform grid of `resolution`.
///
/// In order: rows at or after `boundary - native interval` are dropped, repeated timestamps
/// keep their first occurrence, rows are sorted by time, and each grid point from the first
/// timestamp onward is linearly interpolated in time between the nearest known values of
/// its column. Grid points outside a column's known range stay missing.
pub fn resample(
    table: &TimeSeriesTable,
    resolution: Resolution,
    boundary: &QualityBoundary,
) -> Result<TimeSeriesTable> {
    let micros = table.timestamp_micros()?;
    let native = native_interval_micros(&micros);

    let mut rows: Vec<usize> = (0..micros.len()).collect();

    if let Some(first_unavailable) = boundary.first_unavailable {
        let cutoff = naive_to_micros(first_unavailable) - native;
        rows.retain(|&row| micros[row] <= cutoff);
        debug!(
            native_interval_minutes = native / MICROS_PER_MINUTE,
            kept = rows.len(),
            dropped = micros.len() - rows.len(),
            "truncated at quality boundary"
        );
    }

    let mut seen = HashSet::with_capacity(rows.len());
    rows.retain(|&row| seen.insert(micros[row]));
    rows.sort_by_key(|&row| micros[row]);

    let names = table.value_columns();
    let grid = build_grid(&rows, &micros, resolution.step_micros());

    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let values = table.values(&name)?;
        let known: Vec<(i64, f64)> = rows
            .iter()
            .filter_map(|&row| values[row].map(|value| (micros[row], value)))
            .collect();
        columns.push((name, interpolate_onto_grid(&known, &grid)));
    }

    debug!(
        %resolution,
        rows_in = micros.len(),
        rows_out = grid.len(),
        "resampled"
    );

    TimeSeriesTable::from_parts(table.key(), grid, columns)
}

/// Difference between the first two timestamps in row order, zero for shorter tables.
pub fn native_interval_micros(micros: &[i64]) -> i64 {
    match micros {
        [first, second, ..] => second - first,
        _ => 0,
    }
}

fn build_grid(rows: &[usize], micros: &[i64], step: i64) -> Vec<i64> {
    let (Some(&first), Some(&last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };
    let (start, end) = (micros[first], micros[last]);

    let mut grid = Vec::new();
    let mut current = start;
    while current <= end {
        grid.push(current);
        current += step;
    }
    grid
}

/// `known` must be sorted by time with unique timestamps; `grid` must be increasing.
fn interpolate_onto_grid(known: &[(i64, f64)], grid: &[i64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(grid.len());
    let mut upper = 0;

    for &target in grid {
        while upper < known.len() && known[upper].0 < target {
            upper += 1;
        }
        let value = match known.get(upper) {
            Some(&(ts, value)) if ts == target => Some(value),
            Some(&(ts, value)) if upper > 0 => {
                let (prev_ts, prev_value) = known[upper - 1];
                let weight = (target - prev_ts) as f64 / (ts - prev_ts) as f64;
                Some(prev_value + (value - prev_value) * weight)
            }
            _ => None,
        };
        out.push(value);
    }

    out
}
