use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("unsupported file format for '{file_name}'; upload a CSV or Excel file (.csv, .xls, .xlsx)")]
    UnsupportedFormat { file_name: String },

    #[error("{reader} header invalid: {message}")]
    InvalidHeader {
        reader: &'static str,
        message: String,
    },

    #[error("{reader} CSV error: {source}")]
    Csv {
        reader: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{reader} workbook error: {message}")]
    Workbook {
        reader: &'static str,
        message: String,
    },

    #[error("{reader} validation error: {message}")]
    Validation {
        reader: &'static str,
        message: String,
    },

    #[error("{reader} file did not contain any data rows")]
    EmptyData { reader: &'static str },

    #[error("table column '{column}' is not string typed and could not be cast: {source}")]
    ColumnCast {
        column: String,
        #[source]
        source: polars::error::PolarsError,
    },
}
