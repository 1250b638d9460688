use chrono::{DateTime, NaiveDateTime, Utc};
use gridprep_parser::DEFAULT_TIMESTAMP_FORMAT;
use polars::prelude::*;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::series::TimeSeriesTable;

pub const DEFAULT_INTERVAL_SEPARATOR: &str = " - ";

/// The one timestamp policy shared by boundary detection and time-column parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pattern: String,
    interval_separator: String,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            interval_separator: DEFAULT_INTERVAL_SEPARATOR.to_string(),
        }
    }
}

impl TimestampFormat {
    pub fn new(pattern: impl Into<String>, interval_separator: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            interval_separator: interval_separator.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn interval_separator(&self) -> &str {
        &self.interval_separator
    }

    pub fn is_interval(&self, value: &str) -> bool {
        value.contains(self.interval_separator.as_str())
    }

    /// `"<start> - <end>"` yields `<start>`; anything else is returned whole.
    pub fn start_component<'a>(&self, value: &'a str) -> &'a str {
        value
            .split_once(self.interval_separator.as_str())
            .map(|(start, _)| start)
            .unwrap_or(value)
    }

    pub fn parse_instant(&self, value: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), &self.pattern).ok()
    }

    /// Parses the start of an interval string, or the whole value when it is a single instant.
    pub fn parse_start(&self, row: usize, value: &str) -> Result<NaiveDateTime> {
        let start = self.start_component(value);
        self.parse_instant(start)
            .ok_or_else(|| PipelineError::TimestampParse {
                row,
                value: value.to_string(),
                format: self.pattern.clone(),
            })
    }
}

/// Replaces the string time column with one parsed instant per row and promotes it to the
/// table key. Interval encoding is decided once, from the first row.
pub fn parse_time_column(
    df: &DataFrame,
    time_column: &str,
    format: &TimestampFormat,
) -> Result<TimeSeriesTable> {
    let column = df
        .column(time_column)
        .map_err(|_| PipelineError::MissingColumn(time_column.to_string()))?;

    if column.dtype() != &DataType::String {
        return TimeSeriesTable::from_frame(df.clone(), time_column);
    }

    let values = column.str()?;
    let interval_encoded = values.get(0).is_some_and(|first| format.is_interval(first));
    debug!(
        column = time_column,
        interval_encoded,
        rows = values.len(),
        "parsing time column"
    );

    let mut micros = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        let value = value.ok_or(PipelineError::MissingTimestamp { row })?;
        let instant = if interval_encoded {
            format.parse_start(row, value)?
        } else {
            format
                .parse_instant(value)
                .ok_or_else(|| PipelineError::TimestampParse {
                    row,
                    value: value.to_string(),
                    format: format.pattern().to_string(),
                })?
        };
        micros.push(naive_to_micros(instant));
    }

    let key = Series::new(time_column.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|existing| {
            if existing.name().as_str() == time_column {
                key.clone().into()
            } else {
                existing.clone()
            }
        })
        .collect();

    TimeSeriesTable::from_frame(DataFrame::new(columns)?, time_column)
}

pub fn naive_from_micros(value: i64) -> Option<NaiveDateTime> {
    let secs = value.div_euclid(1_000_000);
    let micros = value.rem_euclid(1_000_000) as u32;
    DateTime::<Utc>::from_timestamp(secs, micros * 1_000).map(|dt| dt.naive_utc())
}

pub fn naive_to_micros(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_micros()
}
