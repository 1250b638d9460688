use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::palette::color_for_column;
use crate::series::TimeSeriesTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub value: Option<f64>,
}

/// `month` is the first day of the calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnTrends {
    pub column: String,
    pub color: &'static str,
    pub daily_mean: Vec<DailyPoint>,
    pub monthly_max: Vec<MonthlyPoint>,
    pub monthly_sum: Vec<MonthlyPoint>,
    pub monthly_delta: Vec<MonthlyPoint>,
    pub stats: DescriptiveStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendReport {
    pub columns: Vec<ColumnTrends>,
}

impl TrendReport {
    pub fn column(&self, name: &str) -> Option<&ColumnTrends> {
        self.columns.iter().find(|trends| trends.column == name)
    }
}

/// Daily means, monthly maxima, monthly sums and their month-over-month change, and
/// descriptive statistics for every value column. Calendar buckets are contiguous from the
/// first to the last timestamp, so empty days and months appear with a missing value
/// (or a zero sum).
pub fn aggregate_trends(table: &TimeSeriesTable) -> Result<TrendReport> {
    let timestamps = table.timestamps()?;
    let (Some(first), Some(last)) = (timestamps.iter().min(), timestamps.iter().max()) else {
        let columns = table
            .value_columns()
            .into_iter()
            .enumerate()
            .map(|(idx, column)| ColumnTrends {
                column,
                color: color_for_column(idx),
                daily_mean: Vec::new(),
                monthly_max: Vec::new(),
                monthly_sum: Vec::new(),
                monthly_delta: Vec::new(),
                stats: DescriptiveStats::default(),
            })
            .collect();
        return Ok(TrendReport { columns });
    };

    let first_day = first.date();
    let last_day = last.date();
    let days = day_range(first_day, last_day);
    let months = month_range(first_day, last_day);

    let mut columns = Vec::new();
    for (idx, column) in table.value_columns().into_iter().enumerate() {
        let values = table.values(&column)?;

        let mut day_buckets: Vec<Vec<f64>> = vec![Vec::new(); days.len()];
        let mut month_buckets: Vec<Vec<f64>> = vec![Vec::new(); months.len()];
        for (ts, value) in timestamps.iter().zip(values.iter()) {
            let Some(value) = *value else {
                continue;
            };
            let date = ts.date();
            day_buckets[(date - first_day).num_days() as usize].push(value);
            month_buckets[month_offset(first_day, date)].push(value);
        }

        let daily_mean = days
            .iter()
            .zip(day_buckets.iter())
            .map(|(day, bucket)| DailyPoint {
                day: *day,
                value: mean(bucket),
            })
            .collect();

        let monthly_max = months
            .iter()
            .zip(month_buckets.iter())
            .map(|(month, bucket)| MonthlyPoint {
                month: *month,
                value: bucket.iter().copied().reduce(f64::max),
            })
            .collect();

        let sums: Vec<f64> = month_buckets
            .iter()
            .map(|bucket| bucket.iter().sum())
            .collect();
        let monthly_sum = months
            .iter()
            .zip(sums.iter())
            .map(|(month, sum)| MonthlyPoint {
                month: *month,
                value: Some(*sum),
            })
            .collect();
        let monthly_delta = months
            .iter()
            .zip(monthly_deltas(&sums))
            .map(|(month, delta)| MonthlyPoint {
                month: *month,
                value: delta,
            })
            .collect();

        columns.push(ColumnTrends {
            stats: describe(&values),
            column,
            color: color_for_column(idx),
            daily_mean,
            monthly_max,
            monthly_sum,
            monthly_delta,
        });
    }

    Ok(TrendReport { columns })
}

/// First difference of consecutive monthly sums; the first month has no predecessor.
pub fn monthly_deltas(sums: &[f64]) -> Vec<Option<f64>> {
    let mut deltas = Vec::with_capacity(sums.len());
    if !sums.is_empty() {
        deltas.push(None);
    }
    deltas.extend(sums.windows(2).map(|pair| Some(pair[1] - pair[0])));
    deltas
}

/// Count, mean, sample standard deviation, min, quartiles (linear interpolation between
/// order statistics) and max over the present values.
pub fn describe(values: &[Option<f64>]) -> DescriptiveStats {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return DescriptiveStats::default();
    }
    present.sort_by(|a, b| a.total_cmp(b));

    let count = present.len();
    let mean_value = present.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let squares: f64 = present.iter().map(|v| (v - mean_value).powi(2)).sum();
        Some((squares / (count - 1) as f64).sqrt())
    } else {
        None
    };

    DescriptiveStats {
        count,
        mean: Some(mean_value),
        std,
        min: present.first().copied(),
        p25: Some(quantile(&present, 0.25)),
        p50: Some(quantile(&present, 0.5)),
        p75: Some(quantile(&present, 0.75)),
        max: present.last().copied(),
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn mean(bucket: &[f64]) -> Option<f64> {
    if bucket.is_empty() {
        None
    } else {
        Some(bucket.iter().sum::<f64>() / bucket.len() as f64)
    }
}

fn day_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|day| *day <= last).collect()
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_offset(first: NaiveDate, date: NaiveDate) -> usize {
    let months = (date.year() - first.year()) * 12 + date.month() as i32 - first.month() as i32;
    months as usize
}

fn month_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = month_start(first);
    let end = month_start(last);
    while current <= end {
        months.push(current);
        current = match current.checked_add_months(chrono::Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    months
}
