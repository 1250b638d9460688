use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::numeric::coerce_numeric;
use crate::timestamps::naive_from_micros;
use crate::types::CoercionPolicy;

fn key_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Microseconds, None)
}

/// A frame keyed by a naive timestamp column. The key is always the first column and has no
/// nulls; every other column is `Float64` with nulls as the missing marker.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    frame: DataFrame,
    key: String,
}

impl TimeSeriesTable {
    /// Promotes `key` to the time index of `frame`. The key must already be temporal; value
    /// columns are coerced to floats, with non-numeric cells becoming missing.
    pub fn from_frame(frame: DataFrame, key: &str) -> Result<Self> {
        let key_column = frame
            .column(key)
            .map_err(|_| PipelineError::MissingColumn(key.to_string()))?;

        let key_column = match key_column.dtype() {
            DataType::Datetime(TimeUnit::Microseconds, None) => key_column.clone(),
            DataType::Datetime(_, _) | DataType::Date => key_column.cast(&key_dtype())?,
            other => {
                return Err(PipelineError::NotTemporal {
                    column: key.to_string(),
                    dtype: other.to_string(),
                })
            }
        };

        if key_column.null_count() > 0 {
            let physical = key_column.cast(&DataType::Int64)?;
            let row = physical
                .i64()?
                .into_iter()
                .position(|value| value.is_none())
                .unwrap_or(0);
            return Err(PipelineError::MissingTimestamp { row });
        }

        let mut columns: Vec<Column> = Vec::with_capacity(frame.width());
        columns.push(key_column);
        for column in frame.get_columns() {
            if column.name().as_str() == key {
                continue;
            }
            let coerced = coerce_numeric(column, CoercionPolicy::Lenient)?;
            if coerced.nulled > 0 {
                warn!(
                    column = column.name().as_str(),
                    nulled = coerced.nulled,
                    "non-numeric cells coerced to missing"
                );
            }
            columns.push(Series::new(column.name().clone(), coerced.values).into());
        }

        Ok(Self {
            frame: DataFrame::new(columns)?,
            key: key.to_string(),
        })
    }

    /// Builds a table from already-typed parts; `columns` must match `timestamps` in length.
    pub fn from_parts(
        key: &str,
        timestamps: Vec<i64>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        let mut cols: Vec<Column> = Vec::with_capacity(columns.len() + 1);
        cols.push(
            Series::new(key.into(), timestamps)
                .cast(&key_dtype())?
                .into(),
        );
        for (name, values) in columns {
            cols.push(Series::new(name.as_str().into(), values).into());
        }
        Ok(Self {
            frame: DataFrame::new(cols)?,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Demotes the key back to an ordinary first column.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn value_columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .filter(|name| name.as_str() != self.key)
            .map(|name| name.to_string())
            .collect()
    }

    /// Key values as microseconds since the epoch, in row order.
    pub fn timestamp_micros(&self) -> Result<Vec<i64>> {
        let physical = self.frame.column(&self.key)?.cast(&DataType::Int64)?;
        let micros = physical.i64()?.into_iter().flatten().collect();
        Ok(micros)
    }

    pub fn timestamps(&self) -> Result<Vec<NaiveDateTime>> {
        self.timestamp_micros()?
            .into_iter()
            .enumerate()
            .map(|(row, micros)| {
                naive_from_micros(micros).ok_or(PipelineError::MissingTimestamp { row })
            })
            .collect()
    }

    pub fn values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        let column = self
            .frame
            .column(column)
            .map_err(|_| PipelineError::MissingColumn(column.to_string()))?;
        Ok(column.f64()?.into_iter().collect())
    }

    /// Rows whose calendar day lies in `[start, end]`, both ends inclusive.
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let keep: Vec<bool> = self
            .timestamps()?
            .iter()
            .map(|ts| {
                let day = ts.date();
                day >= start && day <= end
            })
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(Self {
            frame: self.frame.filter(&mask)?,
            key: self.key.clone(),
        })
    }
}
