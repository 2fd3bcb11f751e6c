//! Generator configuration, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::core::assembly::CorrectAnswer;
use crate::core::number::NumberFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How per-template queries are dispatched within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dispatch {
    #[default]
    Sequential,
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Deadline for each knowledge-graph query.
    pub query_timeout_ms: u64,
    /// Marker shared by question text and query template.
    pub placeholder: String,
    pub correct_answer: CorrectAnswer,
    pub dispatch: Dispatch,
    pub number_format: NumberFormat,
    /// Pins the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: 5_000,
            placeholder: "$$$".to_string(),
            correct_answer: CorrectAnswer::Random,
            dispatch: Dispatch::Sequential,
            number_format: NumberFormat::default(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<GeneratorConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a configuration from a RON string. Missing fields take defaults;
    /// unknown fields are rejected.
    pub fn parse_ron(input: &str) -> Result<GeneratorConfig, ConfigError> {
        let config: GeneratorConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "query_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.placeholder.is_empty() {
            return Err(ConfigError::Invalid("placeholder must not be empty".to_string()));
        }
        if self.number_format.thousands == self.number_format.decimal {
            return Err(ConfigError::Invalid(format!(
                "thousands and decimal separators must differ, both are '{}'",
                self.number_format.decimal
            )));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}
