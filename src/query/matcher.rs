//! The match abstraction every query node implements.
//!
//! A matcher is a stateful, resumable evaluation node. Repeated calls to
//! [`Matcher::fill`] continue where the previous call stopped and, unless the
//! node is an ordering stage, produce ascending document ids. A fill that
//! returns `0` is terminal until [`Matcher::reset`].
//!
//! Scoring is a second pass over ids the matcher already produced: callers
//! fill a buffer, then hand the same ids to [`Matcher::score`].

use std::fmt::Debug;

use crate::DocId;
use crate::error::{LexmatchError, Result};
use crate::query::inspect::QueryInspectionNode;

/// Score assigned by matches that carry no boost or score function.
pub const NEUTRAL_SCORE: f32 = 1.0;

/// Trait for document matchers.
pub trait Matcher: Send + Debug {
    /// Write up to `buffer.len()` matching ids into `buffer`.
    ///
    /// Returns the number written. `0` means the matcher is exhausted.
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize>;

    /// Random-access membership test. Does not move the fill position.
    fn evaluate(&mut self, doc_id: DocId) -> Result<bool>;

    /// Compute one score per id into `scores`.
    ///
    /// Every id must be a match of this node; `scores` must be as long as
    /// `doc_ids`.
    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()>;

    /// Whether a boost or score function sits in this subtree.
    ///
    /// Unscored matches give every id [`NEUTRAL_SCORE`] and contribute
    /// nothing to the sums of their parent combinators.
    fn is_scored(&self) -> bool {
        false
    }

    /// Whether this node reorders its output (ordering stages only).
    fn is_ordered(&self) -> bool {
        false
    }

    /// Rewind to the first id.
    fn reset(&mut self);

    /// Estimated number of ids this matcher produces.
    fn cost(&self) -> u64;

    /// Describe this node and its children.
    fn inspect(&self) -> QueryInspectionNode;
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        (**self).fill(buffer)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        (**self).evaluate(doc_id)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        (**self).score(doc_ids, scores)
    }

    fn is_scored(&self) -> bool {
        (**self).is_scored()
    }

    fn is_ordered(&self) -> bool {
        (**self).is_ordered()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }

    fn inspect(&self) -> QueryInspectionNode {
        (**self).inspect()
    }
}

/// A type-erased matcher borrowing from an index reader.
pub type BoxedMatcher<'a> = Box<dyn Matcher + 'a>;

/// Fail when `child` is an ordering stage; those may only sit at the root.
pub(crate) fn reject_ordered(operation: &str, child: &dyn Matcher) -> Result<()> {
    if child.is_ordered() {
        return Err(LexmatchError::query(format!(
            "{operation} cannot wrap {}: ordering must be the root of a match tree",
            child.inspect().operation
        )));
    }
    Ok(())
}

/// Fail when a score buffer does not line up with its ids.
pub(crate) fn check_score_buffers(doc_ids: &[DocId], scores: &[f32]) -> Result<()> {
    if doc_ids.len() != scores.len() {
        return Err(LexmatchError::invalid_argument(format!(
            "score buffer holds {} slots for {} ids",
            scores.len(),
            doc_ids.len()
        )));
    }
    Ok(())
}

/// Fill repeatedly until the matcher is exhausted and return every id.
pub fn fill_all<M: Matcher + ?Sized>(matcher: &mut M, batch_size: usize) -> Result<Vec<DocId>> {
    let mut buffer = vec![0; batch_size.max(1)];
    let mut out = Vec::new();

    loop {
        let read = matcher.fill(&mut buffer)?;
        if read == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buffer[..read]);
    }
}

/// A matcher that matches no documents.
#[derive(Debug, Default)]
pub struct EmptyMatcher;

impl EmptyMatcher {
    /// Create a new empty matcher.
    pub fn new() -> Self {
        EmptyMatcher
    }
}

impl Matcher for EmptyMatcher {
    fn fill(&mut self, _buffer: &mut [DocId]) -> Result<usize> {
        Ok(0)
    }

    fn evaluate(&mut self, _doc_id: DocId) -> Result<bool> {
        Ok(false)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        check_score_buffers(doc_ids, scores)?;
        scores.fill(NEUTRAL_SCORE);
        Ok(())
    }

    fn reset(&mut self) {}

    fn cost(&self) -> u64 {
        0
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("EmptyMatch")
    }
}

/// A matcher that matches all documents.
#[derive(Debug)]
pub struct AllMatcher {
    next_doc: DocId,
    max_doc: DocId,
}

impl AllMatcher {
    /// Match ids `0..max_doc`.
    pub fn new(max_doc: DocId) -> Self {
        AllMatcher {
            next_doc: 0,
            max_doc,
        }
    }
}

impl Matcher for AllMatcher {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        let available = (self.max_doc - self.next_doc).min(buffer.len() as u64) as usize;
        for (slot, doc) in buffer[..available].iter_mut().zip(self.next_doc..) {
            *slot = doc;
        }
        self.next_doc += available as u64;
        Ok(available)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        Ok(doc_id < self.max_doc)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        check_score_buffers(doc_ids, scores)?;
        scores.fill(NEUTRAL_SCORE);
        Ok(())
    }

    fn reset(&mut self) {
        self.next_doc = 0;
    }

    fn cost(&self) -> u64 {
        self.max_doc
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("AllMatch").with_parameter("Count", self.max_doc)
    }
}
