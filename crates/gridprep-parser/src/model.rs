use std::collections::BTreeSet;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ParserError;

/// Tokens the grid-transparency exports use for "not available".
pub const DEFAULT_NA_TOKENS: [&str; 4] = ["nan", "n/e", "no", "na"];

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Case-sensitive set of cell values that load as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelTokens(BTreeSet<String>);

impl SentinelTokens {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    /// Empty cells count as missing regardless of the configured tokens.
    pub fn is_missing(&self, value: &str) -> bool {
        value.is_empty() || self.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SentinelTokens {
    fn default() -> Self {
        Self::new(DEFAULT_NA_TOKENS)
    }
}

impl fmt::Display for SentinelTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", joined.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub tokens: SentinelTokens,
    pub delimiter: u8,
    /// Rendering used for spreadsheet date cells so they parse like CSV text.
    pub datetime_format: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            tokens: SentinelTokens::default(),
            delimiter: b',',
            datetime_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// An uploaded table before any typing: every column is `String`, missing cells are null.
#[derive(Debug, Clone)]
pub struct RawTable {
    df: DataFrame,
}

impl RawTable {
    /// Wraps a frame, casting every non-string column to `String`.
    pub fn from_frame(df: DataFrame) -> Result<Self, ParserError> {
        let mut columns: Vec<Column> = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            if column.dtype() == &DataType::String {
                columns.push(column.clone());
                continue;
            }
            let cast = column
                .cast(&DataType::String)
                .map_err(|source| ParserError::ColumnCast {
                    column: column.name().to_string(),
                    source,
                })?;
            columns.push(cast);
        }
        let df = DataFrame::new(columns).map_err(|err| ParserError::Validation {
            reader: "RAW_TABLE",
            message: format!("failed to rebuild raw table: {err}"),
        })?;
        Ok(Self { df })
    }

    pub(crate) fn from_string_frame(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    /// Cell value at `row` of `column`, `None` when missing.
    pub fn cell(&self, column: &str, row: usize) -> Option<&str> {
        self.df
            .column(column)
            .ok()
            .and_then(|column| column.str().ok())
            .and_then(|values| values.get(row))
    }
}
