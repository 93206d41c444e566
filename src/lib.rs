//! # Lexmatch
//!
//! The match evaluation and scoring core of an embedded search engine built
//! on a sorted-term inverted index.
//!
//! ## Features
//!
//! - Pull-based, resumable, batched matching: every query node fills a
//!   caller-owned buffer of ascending document ids
//! - Term, prefix, negated-prefix and IN-list lookups driven by term providers
//! - And / Or / AndNot combinators with order-preserving merges
//! - Constant and function boosts that compose across nested operators
//! - Ordering by score or by field values, optionally bounded to top-K
//! - Query inspection trees for explain output

pub mod document;
pub mod error;
pub mod full_text;
pub mod full_text_search;
pub mod query;
pub mod util;

/// Engine-internal dense document identifier.
pub type DocId = u64;

pub mod prelude {
    pub use crate::DocId;
    pub use crate::document::{Document, FieldValue};
    pub use crate::error::{LexmatchError, Result};
    pub use crate::full_text::{IndexConfig, IndexReader, MemoryIndex, MemoryIndexWriter};
    pub use crate::full_text_search::{IndexSearcher, SearchHit, SearchResults};
    pub use crate::query::{
        MatchConfig, Matcher, QueryInspectionNode, QueryNode, ScoreFunction, SortComparer,
        fill_all,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
