//! Core full-text types and interfaces.
//!
//! This module provides the term dictionary, posting lists and the
//! read-only [`IndexReader`] interface the matching engine consumes, plus an
//! in-memory index build path producing immutable snapshots.

pub mod config;
pub mod dictionary;
pub mod memory;
pub mod posting;
pub mod reader;
pub mod writer;

// Re-export core types
pub use config::IndexConfig;
pub use dictionary::{SortedTermDictionary, TermInfo};
pub use memory::MemoryIndex;
pub use posting::{BlockPostingCursor, PostingCursor};
pub use reader::{IndexReader, TermCursor};
pub use writer::MemoryIndexWriter;
