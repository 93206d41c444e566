//! Multi-term matching.
//!
//! A multi-term match expands a [`TermProvider`] once, at construction, into
//! one [`TermMatcher`] per qualifying term and then behaves as an N-way union
//! over them. Scoring is delegated per term to an optional score function, so
//! different terms can contribute different weights.

use std::sync::Arc;

use crate::DocId;
use crate::error::{LexmatchError, Result};
use crate::query::config::MatchConfig;
use crate::query::inspect::QueryInspectionNode;
use crate::query::lookahead::Union;
use crate::query::matcher::{Matcher, NEUTRAL_SCORE, check_score_buffers};
use crate::query::scorer::{ScoreContext, ScoreFunction};
use crate::query::term::TermMatcher;
use crate::query::term_provider::TermProvider;

/// Union over every term a provider yields.
#[derive(Debug)]
pub struct MultiTermMatcher<'a> {
    provider: Box<dyn TermProvider<'a> + 'a>,
    terms: Union<TermMatcher<'a>>,
    score_function: Option<Arc<dyn ScoreFunction>>,
    total_docs: u64,
    cost: u64,
}

impl<'a> MultiTermMatcher<'a> {
    /// Expand `provider` into its term matchers.
    ///
    /// Fails when the provider yields more terms than
    /// [`MatchConfig::max_expansions`] allows.
    pub fn new(mut provider: Box<dyn TermProvider<'a> + 'a>, config: &MatchConfig) -> Result<Self> {
        let mut terms = Vec::new();
        while let Some(term) = provider.next_term()? {
            if let Some(max) = config.max_expansions {
                if terms.len() >= max {
                    return Err(LexmatchError::query(format!(
                        "{} on field '{}' expands to more than {max} terms",
                        provider.inspect().operation,
                        provider.field()
                    )));
                }
            }
            terms.push(term);
        }

        let cost = terms.iter().map(TermMatcher::doc_freq).sum();
        log::debug!(
            "expanded {} on field '{}' to {} terms",
            provider.inspect().operation,
            provider.field(),
            terms.len()
        );

        Ok(MultiTermMatcher {
            provider,
            terms: Union::new(terms, config.fill_batch_size),
            score_function: None,
            total_docs: 0,
            cost,
        })
    }

    /// Score each id by summing `function` over the terms containing it.
    pub fn with_score_function(mut self, function: Arc<dyn ScoreFunction>, total_docs: u64) -> Self {
        self.score_function = Some(function);
        self.total_docs = total_docs;
        self
    }

    /// Number of expanded terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

impl Matcher for MultiTermMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        self.terms.fill(buffer)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        for term in self.terms.children_mut() {
            if term.evaluate(doc_id)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        check_score_buffers(doc_ids, scores)?;

        let Some(function) = self.score_function.as_ref() else {
            scores.fill(NEUTRAL_SCORE);
            return Ok(());
        };

        scores.fill(0.0);
        for term in self.terms.children_mut() {
            let doc_freq = term.doc_freq();
            for (&doc_id, score) in doc_ids.iter().zip(scores.iter_mut()) {
                if term.evaluate(doc_id)? {
                    *score += function.score(&ScoreContext {
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
        self.score_function.is_some()
    }

    fn reset(&mut self) {
        self.terms.reset();
    }

    fn cost(&self) -> u64 {
        self.cost
    }

    fn inspect(&self) -> QueryInspectionNode {
        let mut node = QueryInspectionNode::new("MultiTermMatch")
            .with_parameter("Field", self.provider.field())
            .with_parameter("TermCount", self.terms.len());
        if let Some(function) = &self.score_function {
            node = node.with_parameter("ScoreFunction", function.name());
        }
        node.with_child(self.provider.inspect())
            .with_children(self.terms.children().map(Matcher::inspect))
    }
}
