//! Search façade: builds match trees over an index reader and collects hits.

pub mod searcher;

pub use searcher::{IndexSearcher, SearchHit, SearchResults};
