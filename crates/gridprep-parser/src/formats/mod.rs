mod common;
mod csv_table;
mod spreadsheet;

pub use csv_table::CsvTableReader;
pub use spreadsheet::SpreadsheetReader;
