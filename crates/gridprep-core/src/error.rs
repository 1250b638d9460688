use gridprep_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Loading the uploaded table failed: {0}")]
    Loader(#[from] ParserError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file is invalid: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Column '{0}' not found in table")]
    MissingColumn(String),

    #[error("Time column '{column}' must be temporal, found {dtype}")]
    NotTemporal { column: String, dtype: String },

    #[error("Row {row} has no timestamp")]
    MissingTimestamp { row: usize },

    #[error("Row {row}: timestamp '{value}' does not match format '{format}'")]
    TimestampParse {
        row: usize,
        value: String,
        format: String,
    },

    #[error("Column '{column}' row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
