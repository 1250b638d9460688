pub mod errors;
pub mod formats;
pub mod model;
mod registry;
mod sentinel;

pub use errors::ParserError;
pub use model::{
    LoadOptions, RawTable, SentinelTokens, DEFAULT_NA_TOKENS, DEFAULT_TIMESTAMP_FORMAT,
};
pub use registry::{load_table, load_with_readers, TableReader};
pub use sentinel::{missing_counts, normalize_sentinels};

#[cfg(test)]
mod tests;
