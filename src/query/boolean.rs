//! Boolean combinators: intersection, union and exclusion.
//!
//! Scores are additive: an id scores the sum of what its *scored* children
//! assign it, and [`NEUTRAL_SCORE`] when no scored child contains it.

use crate::DocId;
use crate::error::{LexmatchError, Result};
use crate::query::config::MatchConfig;
use crate::query::inspect::QueryInspectionNode;
use crate::query::lookahead::Union;
use crate::query::matcher::{
    BoxedMatcher, Matcher, NEUTRAL_SCORE, check_score_buffers, reject_ordered,
};

/// Scratch buffers for chunked child scoring, allocated once per combinator.
#[derive(Debug)]
struct ScoreScratch {
    ids: Vec<DocId>,
    slots: Vec<usize>,
    scores: Vec<f32>,
    hits: Vec<bool>,
}

impl ScoreScratch {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ScoreScratch {
            ids: vec![0; capacity],
            slots: vec![0; capacity],
            scores: vec![0.0; capacity],
            hits: vec![false; capacity],
        }
    }

    fn capacity(&self) -> usize {
        self.ids.len()
    }

    /// Sum the scored children's scores for one chunk of at most `capacity` ids.
    ///
    /// With `check_membership` a child only scores the ids it contains.
    fn sum_chunk<'c, M, I>(
        &mut self,
        children: I,
        doc_ids: &[DocId],
        scores: &mut [f32],
        check_membership: bool,
    ) -> Result<()>
    where
        M: Matcher + 'c,
        I: IntoIterator<Item = &'c mut M>,
    {
        let hits = &mut self.hits[..doc_ids.len()];
        hits.fill(false);
        scores.fill(0.0);

        for child in children.into_iter().filter(|child| child.is_scored()) {
            let mut count = 0;
            for (slot, &doc_id) in doc_ids.iter().enumerate() {
                if !check_membership || child.evaluate(doc_id)? {
                    self.ids[count] = doc_id;
                    self.slots[count] = slot;
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }

            child.score(&self.ids[..count], &mut self.scores[..count])?;
            for (&slot, &score) in self.slots[..count].iter().zip(&self.scores[..count]) {
                scores[slot] += score;
                hits[slot] = true;
            }
        }

        for (score, &hit) in scores.iter_mut().zip(hits.iter()) {
            if !hit {
                *score = NEUTRAL_SCORE;
            }
        }
        Ok(())
    }
}

/// Intersection of two or more children.
///
/// The cheapest child drives: its fills are filtered in place through the
/// other children's [`Matcher::evaluate`].
#[derive(Debug)]
pub struct AndMatcher<'a> {
    children: Vec<BoxedMatcher<'a>>,
    driver: usize,
    scratch: ScoreScratch,
}

impl<'a> AndMatcher<'a> {
    /// Create an intersection. Fails without children or with an ordering child.
    pub fn new(children: Vec<BoxedMatcher<'a>>, config: &MatchConfig) -> Result<Self> {
        if children.is_empty() {
            return Err(LexmatchError::query("AndMatch requires at least one child"));
        }
        for child in &children {
            reject_ordered("AndMatch", child.as_ref())?;
        }

        let driver = children
            .iter()
            .enumerate()
            .min_by_key(|(_, child)| child.cost())
            .map_or(0, |(index, _)| index);

        Ok(AndMatcher {
            children,
            driver,
            scratch: ScoreScratch::new(config.score_batch_size),
        })
    }

    /// The children, in construction order.
    pub fn children(&self) -> &[BoxedMatcher<'a>] {
        &self.children
    }
}

impl Matcher for AndMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        let mut written = 0;

        // A driver batch may filter down to nothing; keep pulling until the
        // buffer has ids or the driver runs dry.
        while written < buffer.len() {
            let read = self.children[self.driver].fill(&mut buffer[written..])?;
            if read == 0 {
                break;
            }

            let mut kept = written;
            for index in written..written + read {
                let doc_id = buffer[index];
                let mut in_all = true;
                for (position, child) in self.children.iter_mut().enumerate() {
                    if position != self.driver && !child.evaluate(doc_id)? {
                        in_all = false;
                        break;
                    }
                }
                if in_all {
                    buffer[kept] = doc_id;
                    kept += 1;
                }
            }
            written = kept;
        }

        Ok(written)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        for child in &mut self.children {
            if !child.evaluate(doc_id)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        check_score_buffers(doc_ids, scores)?;
        if !self.is_scored() {
            scores.fill(NEUTRAL_SCORE);
            return Ok(());
        }

        let capacity = self.scratch.capacity();
        for (ids, out) in doc_ids.chunks(capacity).zip(scores.chunks_mut(capacity)) {
            self.scratch
                .sum_chunk(self.children.iter_mut(), ids, out, false)?;
        }
        Ok(())
    }

    fn is_scored(&self) -> bool {
        self.children.iter().any(|child| child.is_scored())
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }

    fn cost(&self) -> u64 {
        self.children[self.driver].cost()
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("AndMatch")
            .with_children(self.children.iter().map(|child| child.inspect()))
    }
}

/// Union of any number of children, de-duplicated.
#[derive(Debug)]
pub struct OrMatcher<'a> {
    union: Union<BoxedMatcher<'a>>,
    scratch: ScoreScratch,
    cost: u64,
}

impl<'a> OrMatcher<'a> {
    /// Create a union. Fails with an ordering child.
    pub fn new(children: Vec<BoxedMatcher<'a>>, config: &MatchConfig) -> Result<Self> {
        for child in &children {
            reject_ordered("OrMatch", child.as_ref())?;
        }

        let cost = children.iter().map(|child| child.cost()).sum();
        Ok(OrMatcher {
            union: Union::new(children, config.fill_batch_size),
            scratch: ScoreScratch::new(config.score_batch_size),
            cost,
        })
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.union.len()
    }

    /// Whether the union has no children.
    pub fn is_empty(&self) -> bool {
        self.union.len() == 0
    }
}

impl Matcher for OrMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        self.union.fill(buffer)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        for child in self.union.children_mut() {
            if child.evaluate(doc_id)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        check_score_buffers(doc_ids, scores)?;
        if !self.is_scored() {
            scores.fill(NEUTRAL_SCORE);
            return Ok(());
        }

        let capacity = self.scratch.capacity();
        for (ids, out) in doc_ids.chunks(capacity).zip(scores.chunks_mut(capacity)) {
            self.scratch
                .sum_chunk(self.union.children_mut(), ids, out, true)?;
        }
        Ok(())
    }

    fn is_scored(&self) -> bool {
        self.union.children().any(|child| child.is_scored())
    }

    fn reset(&mut self) {
        self.union.reset();
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("OrMatch")
            .with_children(self.union.children().map(|child| child.inspect()))
    }
}

/// Ids of a base match that are absent from an exclusion match.
///
/// The exclusion is only ever checked through [`Matcher::evaluate`].
#[derive(Debug)]
pub struct AndNotMatcher<'a> {
    base: BoxedMatcher<'a>,
    exclusion: BoxedMatcher<'a>,
}

impl<'a> AndNotMatcher<'a> {
    /// Create an exclusion. Fails when either side is an ordering stage.
    pub fn new(base: BoxedMatcher<'a>, exclusion: BoxedMatcher<'a>) -> Result<Self> {
        reject_ordered("AndNotMatch", base.as_ref())?;
        reject_ordered("AndNotMatch", exclusion.as_ref())?;
        Ok(AndNotMatcher { base, exclusion })
    }
}

impl Matcher for AndNotMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        let mut written = 0;

        while written < buffer.len() {
            let read = self.base.fill(&mut buffer[written..])?;
            if read == 0 {
                break;
            }

            let mut kept = written;
            for index in written..written + read {
                let doc_id = buffer[index];
                if !self.exclusion.evaluate(doc_id)? {
                    buffer[kept] = doc_id;
                    kept += 1;
                }
            }
            written = kept;
        }

        Ok(written)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        Ok(self.base.evaluate(doc_id)? && !self.exclusion.evaluate(doc_id)?)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        self.base.score(doc_ids, scores)
    }

    fn is_scored(&self) -> bool {
        self.base.is_scored()
    }

    fn reset(&mut self) {
        self.base.reset();
        self.exclusion.reset();
    }

    fn cost(&self) -> u64 {
        self.base.cost()
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("AndNotMatch")
            .with_child(self.base.inspect())
            .with_child(self.exclusion.inspect())
    }
}
