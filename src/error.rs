//! Error types for the Lexmatch library.
//!
//! All errors are represented by the [`LexmatchError`] enum. Query-tree
//! configuration problems (unknown fields, invalid `take`, malformed boosts)
//! are reported while the tree is being built, before any fill happens.
//!
//! # Examples
//!
//! ```
//! use lexmatch::error::{LexmatchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexmatchError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lexmatch operations.
#[derive(Error, Debug)]
pub enum LexmatchError {
    /// I/O errors (config files, backing store reads).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Unknown or misconfigured field.
    #[error("Field error: {0}")]
    Field(String),

    /// Query construction errors (invalid take, boost, comparer, nesting).
    #[error("Query error: {0}")]
    Query(String),

    /// Storage-layer failures surfacing through dictionaries and posting cursors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LexmatchError.
pub type Result<T> = std::result::Result<T, LexmatchError>;

impl LexmatchError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        LexmatchError::Index(msg.into())
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        LexmatchError::Field(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        LexmatchError::Query(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LexmatchError::Storage(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LexmatchError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LexmatchError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error was raised while building a query tree.
    pub fn is_configuration(&self) -> bool {
        matches!(self, LexmatchError::Field(_) | LexmatchError::Query(_))
    }
}
