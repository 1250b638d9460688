use std::collections::HashMap;

use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::RawTable;

/// Column-major cell buffer that becomes a string-typed frame.
pub(crate) struct StringColumns {
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
}

impl StringColumns {
    pub fn new(headers: Vec<String>) -> Self {
        let columns = headers.iter().map(|_| Vec::new()).collect();
        Self { headers, columns }
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// Appends one row; short rows are padded with missing cells.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut cells = cells.into_iter();
        for column in self.columns.iter_mut() {
            column.push(cells.next().flatten());
        }
    }

    pub fn build(self, reader: &'static str) -> Result<RawTable, ParserError> {
        if self.rows() == 0 {
            return Err(ParserError::EmptyData { reader });
        }

        let mut cols: Vec<Column> = Vec::with_capacity(self.headers.len());
        for (name, values) in self.headers.iter().zip(self.columns.iter()) {
            let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
            cols.push(Series::new(name.as_str().into(), utf8).into());
        }

        let df = DataFrame::new(cols).map_err(|err| ParserError::Validation {
            reader,
            message: format!("failed to build raw dataframe: {err}"),
        })?;
        Ok(RawTable::from_string_frame(df))
    }
}

/// Trims header names, strips a UTF-8 byte-order mark, names blank headers
/// `column_<index>` and suffixes repeated names with `_<n>`.
pub(crate) fn normalize_headers<'a, I>(
    reader: &'static str,
    raw: I,
) -> Result<Vec<String>, ParserError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for (idx, name) in raw.into_iter().enumerate() {
        let trimmed = name.trim_start_matches('\u{feff}').trim();
        let base = if trimmed.is_empty() {
            format!("column_{idx}")
        } else {
            trimmed.to_string()
        };

        let count = seen.entry(base.clone()).or_insert(0);
        let unique = if *count == 0 {
            base.clone()
        } else {
            format!("{base}_{count}")
        };
        *count += 1;
        headers.push(unique);
    }

    if headers.is_empty() {
        return Err(ParserError::InvalidHeader {
            reader,
            message: "header row is empty".to_string(),
        });
    }

    Ok(headers)
}
