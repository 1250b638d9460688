pub mod boundary;
pub mod config;
pub mod error;
pub mod missing;
mod numeric;
pub mod palette;
pub mod pipeline;
pub mod resample;
pub mod series;
pub mod timestamps;
pub mod trends;
pub mod types;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{load, run, PipelineOutput, PipelineRequest};
pub use series::TimeSeriesTable;
pub use types::{
    CoercionPolicy, MissingValueStrategy, QualityBoundary, Resolution, ResolutionUnit,
};

pub use gridprep_parser::{missing_counts, LoadOptions, ParserError, RawTable, SentinelTokens};
