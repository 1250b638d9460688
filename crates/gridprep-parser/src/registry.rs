use std::path::Path;

use crate::errors::ParserError;
use crate::formats::{CsvTableReader, SpreadsheetReader};
use crate::model::{LoadOptions, RawTable};
use crate::sentinel::normalize_sentinels;

pub trait TableReader {
    fn name(&self) -> &'static str;
    /// Lower-case file extensions, without the leading dot.
    fn extensions(&self) -> &'static [&'static str];
    fn read(&self, bytes: &[u8], options: &LoadOptions) -> Result<RawTable, ParserError>;
}

/// Loads an uploaded file into a [`RawTable`] with sentinel tokens already nulled.
pub fn load_table(
    bytes: &[u8],
    file_name: &str,
    options: &LoadOptions,
) -> Result<RawTable, ParserError> {
    let csv = CsvTableReader;
    let spreadsheet = SpreadsheetReader;
    let readers: [&dyn TableReader; 2] = [&csv, &spreadsheet];
    load_with_readers(bytes, file_name, options, &readers)
}

pub fn load_with_readers(
    bytes: &[u8],
    file_name: &str,
    options: &LoadOptions,
    readers: &[&dyn TableReader],
) -> Result<RawTable, ParserError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let reader = readers
        .iter()
        .find(|reader| reader.extensions().contains(&extension.as_str()))
        .ok_or_else(|| ParserError::UnsupportedFormat {
            file_name: file_name.to_string(),
        })?;

    let raw = reader.read(bytes, options)?;
    normalize_sentinels(&raw, &options.tokens)
}
