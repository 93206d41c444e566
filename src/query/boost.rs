//! Boost matcher - multiplies the score of the inner match.

use std::sync::Arc;

use crate::DocId;
use crate::error::{LexmatchError, Result};
use crate::query::inspect::QueryInspectionNode;
use crate::query::matcher::{BoxedMatcher, Matcher, reject_ordered};
use crate::query::scorer::{ScoreContext, ScoreFunction};

/// How a boost scales its child's score.
#[derive(Debug, Clone)]
pub enum Boost {
    /// A fixed factor.
    Constant(f32),
    /// A factor computed per document.
    Function(Arc<dyn ScoreFunction>),
}

/// Wraps one child and scales its scores. Fill and evaluate pass through.
#[derive(Debug)]
pub struct BoostMatcher<'a> {
    inner: BoxedMatcher<'a>,
    boost: Boost,
    total_docs: u64,
}

impl<'a> BoostMatcher<'a> {
    /// Multiply the child's scores by `boost`.
    ///
    /// Negative and NaN factors are rejected.
    pub fn constant(inner: BoxedMatcher<'a>, boost: f32) -> Result<Self> {
        if boost.is_nan() || boost < 0.0 {
            return Err(LexmatchError::query(format!(
                "boost must be a non-negative number, got {boost}"
            )));
        }
        reject_ordered("BoostMatch", inner.as_ref())?;

        Ok(BoostMatcher {
            inner,
            boost: Boost::Constant(boost),
            total_docs: 0,
        })
    }

    /// Multiply the child's scores by `function`.
    ///
    /// The function sees the child's cost as its document frequency.
    pub fn function(
        inner: BoxedMatcher<'a>,
        function: Arc<dyn ScoreFunction>,
        total_docs: u64,
    ) -> Result<Self> {
        reject_ordered("BoostMatch", inner.as_ref())?;

        Ok(BoostMatcher {
            inner,
            boost: Boost::Function(function),
            total_docs,
        })
    }

    /// The boost applied.
    pub fn boost(&self) -> &Boost {
        &self.boost
    }
}

impl Matcher for BoostMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        self.inner.fill(buffer)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        self.inner.evaluate(doc_id)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        self.inner.score(doc_ids, scores)?;

        match &self.boost {
            Boost::Constant(boost) => {
                for score in scores.iter_mut() {
                    *score *= boost;
                }
            }
            Boost::Function(function) => {
                let doc_freq = self.inner.cost();
                for (&doc_id, score) in doc_ids.iter().zip(scores.iter_mut()) {
                    *score *= function.score(&ScoreContext {
                        doc_id,
                        doc_freq,
                        total_docs: self.total_docs,
                    });
                }
            }
        }
        Ok(())
    }

    fn is_scored(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn cost(&self) -> u64 {
        self.inner.cost()
    }

    fn inspect(&self) -> QueryInspectionNode {
        let node = QueryInspectionNode::new("BoostMatch");
        let node = match &self.boost {
            Boost::Constant(boost) => node.with_parameter("Boost", boost),
            Boost::Function(function) => node.with_parameter("ScoreFunction", function.name()),
        };
        node.with_child(self.inner.inspect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::matcher::{AllMatcher, fill_all};
    use crate::query::scorer::TermFrequencyScore;

    #[test]
    fn test_constant_boost() {
        let mut matcher = BoostMatcher::constant(Box::new(AllMatcher::new(4)), 10.0).unwrap();

        let ids = fill_all(&mut matcher, 3).unwrap();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        let mut scores = vec![0.0; ids.len()];
        matcher.score(&ids, &mut scores).unwrap();
        assert_eq!(scores, vec![10.0; 4]);
        assert!(matcher.is_scored());
    }

    #[test]
    fn test_nested_boosts_multiply() {
        let inner = BoostMatcher::constant(Box::new(AllMatcher::new(2)), 2.0).unwrap();
        let mut matcher = BoostMatcher::constant(Box::new(inner), 0.5).unwrap();

        let mut scores = [0.0; 2];
        matcher.score(&[0, 1], &mut scores).unwrap();
        assert_eq!(scores, [1.0, 1.0]);
    }

    #[test]
    fn test_zero_boost_is_allowed() {
        let mut matcher = BoostMatcher::constant(Box::new(AllMatcher::new(1)), 0.0).unwrap();
        let mut scores = [0.0; 1];
        matcher.score(&[0], &mut scores).unwrap();
        assert_eq!(scores, [0.0]);
    }

    #[test]
    fn test_invalid_boost() {
        assert!(BoostMatcher::constant(Box::new(AllMatcher::new(1)), -1.0).is_err());
        assert!(BoostMatcher::constant(Box::new(AllMatcher::new(1)), f32::NAN).is_err());
    }

    #[test]
    fn test_function_boost_uses_child_cost() {
        let mut matcher = BoostMatcher::function(
            Box::new(AllMatcher::new(4)),
            Arc::new(TermFrequencyScore::new()),
            4,
        )
        .unwrap();

        let mut scores = [0.0; 2];
        matcher.score(&[0, 3], &mut scores).unwrap();
        assert_eq!(scores, [0.25, 0.25]);

        let node = matcher.inspect();
        assert_eq!(node.parameter("ScoreFunction"), Some("TermFrequency"));
        assert_eq!(node.children[0].operation, "AllMatch");
    }
}
