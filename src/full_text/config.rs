//! Configuration for the in-memory index build path.

use serde::{Deserialize, Serialize};

use crate::error::{LexmatchError, Result};

/// Configuration for [`MemoryIndexWriter`](crate::full_text::writer::MemoryIndexWriter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Field under which each document's external identifier is indexed.
    pub id_field: String,
    /// Number of document ids per posting block (one skip entry per block).
    pub posting_block_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            posting_block_size: 128,
        }
    }
}

impl IndexConfig {
    /// Set the id field name.
    pub fn with_id_field<S: Into<String>>(mut self, id_field: S) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Set the posting block size.
    pub fn with_posting_block_size(mut self, size: usize) -> Self {
        self.posting_block_size = size;
        self
    }

    /// Check the configuration for values the writer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.id_field.is_empty() {
            return Err(LexmatchError::invalid_config("id_field must not be empty"));
        }
        if self.posting_block_size == 0 {
            return Err(LexmatchError::invalid_config(
                "posting_block_size must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_config_default() {
        let config = IndexConfig::default();
        assert_eq!(config.id_field, "id");
        assert_eq!(config.posting_block_size, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_index_config_validation() {
        assert!(IndexConfig::default().with_id_field("").validate().is_err());
        assert!(
            IndexConfig::default()
                .with_posting_block_size(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_index_config_partial_json() {
        let config: IndexConfig = serde_json::from_str(r#"{"id_field":"Id"}"#).unwrap();
        assert_eq!(config.id_field, "Id");
        assert_eq!(config.posting_block_size, 128);
    }
}
