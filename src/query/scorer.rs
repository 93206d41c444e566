//! Score functions used by boosts and multi-term matches.

use std::fmt::Debug;

use crate::DocId;

/// Inputs available to a score function for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    /// Document being scored.
    pub doc_id: DocId,
    /// Number of documents matched by the term or subtree being scored.
    pub doc_freq: u64,
    /// Total number of documents in the index.
    pub total_docs: u64,
}

/// Trait for pluggable score functions.
pub trait ScoreFunction: Send + Sync + Debug {
    /// Calculate the score contribution for one document.
    fn score(&self, ctx: &ScoreContext) -> f32;

    /// Get the name of this score function.
    fn name(&self) -> &'static str;
}

/// Scores every document with the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantScore {
    value: f32,
}

impl ConstantScore {
    /// Create a new constant score function.
    pub fn new(value: f32) -> Self {
        ConstantScore { value }
    }

    /// Get the constant.
    pub fn value(&self) -> f32 {
        self.value
    }
}

impl ScoreFunction for ConstantScore {
    fn score(&self, _ctx: &ScoreContext) -> f32 {
        self.value
    }

    fn name(&self) -> &'static str {
        "Constant"
    }
}

/// Inverse document frequency: rarer terms score higher.
///
/// Scores `1 / doc_freq`, and `0` for a term that matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TermFrequencyScore;

impl TermFrequencyScore {
    /// Create a new term frequency score function.
    pub fn new() -> Self {
        TermFrequencyScore
    }
}

impl ScoreFunction for TermFrequencyScore {
    fn score(&self, ctx: &ScoreContext) -> f32 {
        if ctx.doc_freq == 0 {
            return 0.0;
        }
        1.0 / ctx.doc_freq as f32
    }

    fn name(&self) -> &'static str {
        "TermFrequency"
    }
}

/// BM25 inverse document frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdfScore;

impl IdfScore {
    /// Create a new IDF score function.
    pub fn new() -> Self {
        IdfScore
    }
}

impl ScoreFunction for IdfScore {
    fn score(&self, ctx: &ScoreContext) -> f32 {
        if ctx.total_docs == 0 {
            return 0.0;
        }

        let n = ctx.total_docs as f32;
        let df = (ctx.doc_freq as f32).min(n);
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    fn name(&self) -> &'static str {
        "Idf"
    }
}
