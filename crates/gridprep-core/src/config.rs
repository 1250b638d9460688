use std::fs;
use std::path::Path;

use gridprep_parser::{LoadOptions, SentinelTokens, DEFAULT_NA_TOKENS, DEFAULT_TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};

use crate::boundary::DEFAULT_UNAVAILABLE_TOKEN;
use crate::error::{PipelineError, Result};
use crate::timestamps::{TimestampFormat, DEFAULT_INTERVAL_SEPARATOR};
use crate::types::CoercionPolicy;

/// Settings that stay fixed across runs. Every field has a default, so an empty TOML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub na_tokens: Vec<String>,
    pub unavailable_token: String,
    pub interval_separator: String,
    pub timestamp_format: String,
    pub delimiter: char,
    pub strict_numeric: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            na_tokens: DEFAULT_NA_TOKENS.iter().map(|token| token.to_string()).collect(),
            unavailable_token: DEFAULT_UNAVAILABLE_TOKEN.to_string(),
            interval_separator: DEFAULT_INTERVAL_SEPARATOR.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            delimiter: ',',
            strict_numeric: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(PipelineError::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )));
        }
        if self.unavailable_token.is_empty() {
            return Err(PipelineError::Config(
                "unavailable_token must not be empty".to_string(),
            ));
        }
        if self.interval_separator.is_empty() {
            return Err(PipelineError::Config(
                "interval_separator must not be empty".to_string(),
            ));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(PipelineError::Config(
                "timestamp_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        self.validate()?;
        Ok(LoadOptions {
            tokens: SentinelTokens::new(self.na_tokens.iter().cloned()),
            delimiter: self.delimiter as u8,
            datetime_format: self.timestamp_format.clone(),
        })
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        TimestampFormat::new(
            self.timestamp_format.clone(),
            self.interval_separator.clone(),
        )
    }

    pub fn coercion_policy(&self) -> CoercionPolicy {
        if self.strict_numeric {
            CoercionPolicy::Strict
        } else {
            CoercionPolicy::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = PipelineConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.coercion_policy(), CoercionPolicy::Lenient);
        assert_eq!(config.timestamp_format(), TimestampFormat::default());
    }

    #[test]
    fn overrides_flow_into_load_options() {
        let config = PipelineConfig::from_toml_str(
            r#"
            na_tokens = ["n/a"]
            delimiter = ";"
            strict_numeric = true
            "#,
        )
        .expect("config parses");

        let options = config.load_options().expect("ascii delimiter");
        assert_eq!(options.delimiter, b';');
        assert!(options.tokens.contains("n/a"));
        assert!(!options.tokens.contains("n/e"));
        assert_eq!(config.coercion_policy(), CoercionPolicy::Strict);
    }

    #[test]
    fn unknown_keys_and_bad_delimiters_are_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("colour = \"red\""),
            Err(PipelineError::ConfigFile(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("delimiter = \"§\""),
            Err(PipelineError::Config(_))
        ));
    }
}
