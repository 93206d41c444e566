//! Configuration for match evaluation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LexmatchError, Result};

/// Buffer sizes and limits used while building and evaluating match trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Ids buffered per child of a union, and chunk size for draining matches.
    pub fill_batch_size: usize,
    /// Scratch size combinators use when scoring in chunks.
    pub score_batch_size: usize,
    /// Maximum number of terms a multi-term match may expand to.
    pub max_expansions: Option<usize>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fill_batch_size: 64,
            score_batch_size: 256,
            max_expansions: None,
        }
    }
}

impl MatchConfig {
    /// Set the fill batch size.
    pub fn with_fill_batch_size(mut self, size: usize) -> Self {
        self.fill_batch_size = size;
        self
    }

    /// Set the score batch size.
    pub fn with_score_batch_size(mut self, size: usize) -> Self {
        self.score_batch_size = size;
        self
    }

    /// Set the maximum number of expanded terms.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.fill_batch_size == 0 {
            return Err(LexmatchError::invalid_config(
                "fill_batch_size must be greater than zero",
            ));
        }
        if self.score_batch_size == 0 {
            return Err(LexmatchError::invalid_config(
                "score_batch_size must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
