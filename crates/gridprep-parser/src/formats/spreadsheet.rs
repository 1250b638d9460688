use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::errors::ParserError;
use crate::model::{LoadOptions, RawTable};
use crate::registry::TableReader;

use super::common::{normalize_headers, StringColumns};

/// Reads the first worksheet of an `.xls` / `.xlsx` workbook.
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    const NAME: &'static str = "SPREADSHEET";
}

impl TableReader for SpreadsheetReader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xls", "xlsx"]
    }

    fn read(&self, bytes: &[u8], options: &LoadOptions) -> Result<RawTable, ParserError> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|err| ParserError::Workbook {
                reader: Self::NAME,
                message: err.to_string(),
            })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let sheet_name = sheet_names.first().ok_or_else(|| ParserError::Workbook {
            reader: Self::NAME,
            message: "workbook has no sheets".to_string(),
        })?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|err| ParserError::Workbook {
                reader: Self::NAME,
                message: format!("failed to read sheet '{sheet_name}': {err}"),
            })?;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or(ParserError::EmptyData {
            reader: Self::NAME,
        })?;
        let header_cells: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(cell, &options.datetime_format).unwrap_or_default())
            .collect();
        let headers = normalize_headers(Self::NAME, header_cells.iter().map(String::as_str))?;

        let mut columns = StringColumns::new(headers);
        for row in rows {
            columns.push_row(
                row.iter()
                    .map(|cell| cell_to_string(cell, &options.datetime_format)),
            );
        }

        columns.build(Self::NAME)
    }
}

fn cell_to_string(cell: &Data, datetime_format: &str) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(value) => Some(value.clone()),
        Data::Float(value) => Some(value.to_string()),
        Data::Int(value) => Some(value.to_string()),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.format(datetime_format).to_string()),
        other => Some(other.to_string()),
    }
}
