//! Searcher implementation for building and running match trees against an index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LexmatchError, Result};
use crate::full_text::reader::IndexReader;
use crate::query::boolean::{AndMatcher, AndNotMatcher, OrMatcher};
use crate::query::boost::BoostMatcher;
use crate::query::config::MatchConfig;
use crate::query::matcher::{AllMatcher, BoxedMatcher, Matcher};
use crate::query::multi_term::MultiTermMatcher;
use crate::query::node::{QueryNode, ScoreFunctionSpec};
use crate::query::scorer::ScoreFunction;
use crate::query::sort::{FieldComparer, OrderByMatcher, ScoreComparer, SortComparer};
use crate::query::term::TermMatcher;
use crate::query::term_provider::{
    InTermProvider, PredicateTermProvider, TermPredicate, TermProvider,
};

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The internal document ID.
    pub doc_id: u64,
    /// The caller-visible identifier, when the index knows the document.
    pub external_id: Option<String>,
    /// The score.
    pub score: f32,
}

/// Search results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// The hits, in the order the match produced them.
    pub hits: Vec<SearchHit>,
    /// Total number of matching documents.
    pub total_hits: u64,
    /// Maximum score among the returned hits.
    pub max_score: f32,
}

impl SearchResults {
    /// External ids of the hits, skipping unknown documents.
    pub fn external_ids(&self) -> Vec<&str> {
        self.hits
            .iter()
            .filter_map(|hit| hit.external_id.as_deref())
            .collect()
    }

    /// Scores of the hits.
    pub fn scores(&self) -> Vec<f32> {
        self.hits.iter().map(|hit| hit.score).collect()
    }
}

/// Builds match trees over one index reader and collects their results.
///
/// Every builder validates its inputs, so configuration errors surface before
/// the first fill.
#[derive(Debug, Clone)]
pub struct IndexSearcher<'a> {
    reader: &'a dyn IndexReader,
    config: MatchConfig,
}

impl<'a> IndexSearcher<'a> {
    /// Create a searcher with the default configuration.
    pub fn new(reader: &'a dyn IndexReader) -> Self {
        IndexSearcher {
            reader,
            config: MatchConfig::default(),
        }
    }

    /// Create a searcher with a validated configuration.
    pub fn with_config(reader: &'a dyn IndexReader, config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(IndexSearcher { reader, config })
    }

    /// Get the index reader.
    pub fn reader(&self) -> &'a dyn IndexReader {
        self.reader
    }

    /// Get the configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Documents containing the exact term.
    pub fn term_query<T: AsRef<[u8]>>(&self, field: &str, term: T) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(TermMatcher::open(self.reader, field, term.as_ref())?))
    }

    /// Documents with any term satisfying `predicate`, scored per term by `score`.
    pub fn multi_term(
        &self,
        field: &str,
        predicate: TermPredicate,
        score: Option<Arc<dyn ScoreFunction>>,
    ) -> Result<BoxedMatcher<'a>> {
        let provider = PredicateTermProvider::new(self.reader, field, predicate)?;
        self.expand(Box::new(provider), score)
    }

    /// Documents with a term starting with `prefix`.
    pub fn starts_with<T: AsRef<[u8]>>(&self, field: &str, prefix: T) -> Result<BoxedMatcher<'a>> {
        self.multi_term(field, TermPredicate::StartsWith(prefix.as_ref().to_vec()), None)
    }

    /// Documents with a term not starting with `prefix`.
    pub fn not_starts_with<T: AsRef<[u8]>>(
        &self,
        field: &str,
        prefix: T,
    ) -> Result<BoxedMatcher<'a>> {
        self.multi_term(field, TermPredicate::NotStartsWith(prefix.as_ref().to_vec()), None)
    }

    /// Documents matching any of `values`, scored per term by `score`.
    pub fn in_query<I, T>(
        &self,
        field: &str,
        values: I,
        score: Option<Arc<dyn ScoreFunction>>,
    ) -> Result<BoxedMatcher<'a>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let values: Vec<Vec<u8>> = values
            .into_iter()
            .map(|value| value.as_ref().to_vec())
            .collect();
        let provider = InTermProvider::new(self.reader, field, values)?;
        self.expand(Box::new(provider), score)
    }

    fn expand(
        &self,
        provider: Box<dyn TermProvider<'a> + 'a>,
        score: Option<Arc<dyn ScoreFunction>>,
    ) -> Result<BoxedMatcher<'a>> {
        let matcher = MultiTermMatcher::new(provider, &self.config)?;
        Ok(match score {
            Some(function) => Box::new(matcher.with_score_function(function, self.reader.doc_count())),
            None => Box::new(matcher),
        })
    }

    /// Every document.
    pub fn all_entries(&self) -> BoxedMatcher<'a> {
        Box::new(AllMatcher::new(self.reader.doc_count()))
    }

    /// Intersection of `children`.
    pub fn and(&self, children: Vec<BoxedMatcher<'a>>) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(AndMatcher::new(children, &self.config)?))
    }

    /// Union of `children`.
    pub fn or(&self, children: Vec<BoxedMatcher<'a>>) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(OrMatcher::new(children, &self.config)?))
    }

    /// `base` minus `exclusion`.
    pub fn and_not(
        &self,
        base: BoxedMatcher<'a>,
        exclusion: BoxedMatcher<'a>,
    ) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(AndNotMatcher::new(base, exclusion)?))
    }

    /// Multiply `child`'s scores by a constant.
    pub fn boost(&self, child: BoxedMatcher<'a>, boost: f32) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(BoostMatcher::constant(child, boost)?))
    }

    /// Multiply `child`'s scores by a score function.
    pub fn boost_with(
        &self,
        child: BoxedMatcher<'a>,
        function: Arc<dyn ScoreFunction>,
    ) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(BoostMatcher::function(
            child,
            function,
            self.reader.doc_count(),
        )?))
    }

    /// Order `child` by score, highest first.
    pub fn order_by_score(
        &self,
        child: BoxedMatcher<'a>,
        take: Option<usize>,
    ) -> Result<BoxedMatcher<'a>> {
        self.order_by(child, Arc::new(ScoreComparer::new()), take)
    }

    /// Order `child` by `comparer`.
    pub fn order_by(
        &self,
        child: BoxedMatcher<'a>,
        comparer: Arc<dyn SortComparer>,
        take: Option<usize>,
    ) -> Result<BoxedMatcher<'a>> {
        Ok(Box::new(OrderByMatcher::new(
            child,
            comparer,
            self.reader,
            take,
            &self.config,
        )?))
    }

    /// Compile a parsed query tree into a match tree.
    pub fn search(&self, query: &QueryNode) -> Result<BoxedMatcher<'a>> {
        let matcher = self.compile(query)?;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("compiled query: {}", matcher.inspect());
        }
        Ok(matcher)
    }

    fn compile(&self, node: &QueryNode) -> Result<BoxedMatcher<'a>> {
        let score = |spec: &Option<ScoreFunctionSpec>| spec.as_ref().map(ScoreFunctionSpec::build);

        match node {
            QueryNode::Term { field, value } => self.term_query(field, value),
            QueryNode::StartsWith {
                field,
                prefix,
                score: spec,
            } => self.multi_term(field, TermPredicate::StartsWith(prefix.clone().into_bytes()), score(spec)),
            QueryNode::NotStartsWith {
                field,
                prefix,
                score: spec,
            } => self.multi_term(
                field,
                TermPredicate::NotStartsWith(prefix.clone().into_bytes()),
                score(spec),
            ),
            QueryNode::EndsWith {
                field,
                suffix,
                score: spec,
            } => self.multi_term(field, TermPredicate::EndsWith(suffix.clone().into_bytes()), score(spec)),
            QueryNode::Contains {
                field,
                value,
                score: spec,
            } => self.multi_term(field, TermPredicate::Contains(value.clone().into_bytes()), score(spec)),
            QueryNode::NotContains {
                field,
                value,
                score: spec,
            } => self.multi_term(
                field,
                TermPredicate::NotContains(value.clone().into_bytes()),
                score(spec),
            ),
            QueryNode::Exists { field, score: spec } => {
                self.multi_term(field, TermPredicate::Exists, score(spec))
            }
            QueryNode::In {
                field,
                values,
                score: spec,
            } => self.in_query(field, values, score(spec)),
            QueryNode::All => Ok(self.all_entries()),
            QueryNode::And { children } => self.and(self.compile_all(children)?),
            QueryNode::Or { children } => self.or(self.compile_all(children)?),
            QueryNode::AndNot { base, exclusion } => {
                self.and_not(self.compile(base)?, self.compile(exclusion)?)
            }
            QueryNode::Boost { child, boost } => self.boost(self.compile(child)?, *boost),
            QueryNode::BoostBy { child, function } => {
                self.boost_with(self.compile(child)?, function.build())
            }
            QueryNode::OrderByScore {
                child,
                take,
                ascending,
            } => {
                let comparer = if *ascending {
                    ScoreComparer::ascending()
                } else {
                    ScoreComparer::new()
                };
                self.order_by(self.compile(child)?, Arc::new(comparer), parse_take(*take)?)
            }
            QueryNode::OrderByField {
                child,
                field,
                descending,
                take,
            } => {
                let comparer = if *descending {
                    FieldComparer::descending(field.as_str())
                } else {
                    FieldComparer::new(field.as_str())
                };
                self.order_by(self.compile(child)?, Arc::new(comparer), parse_take(*take)?)
            }
        }
    }

    fn compile_all(&self, nodes: &[QueryNode]) -> Result<Vec<BoxedMatcher<'a>>> {
        nodes.iter().map(|node| self.compile(node)).collect()
    }

    /// Drain `matcher`, scoring and resolving external ids of the first `limit` hits.
    ///
    /// Every id `matcher` serves counts towards `total_hits`, including those
    /// past `limit`. Under a bounded ordering stage that is at most its take.
    pub fn collect<M: Matcher + ?Sized>(
        &self,
        matcher: &mut M,
        limit: Option<usize>,
    ) -> Result<SearchResults> {
        let batch_size = self.config.fill_batch_size;
        let mut buffer = vec![0; batch_size];
        let mut scores = vec![0.0; batch_size];
        let mut results = SearchResults::default();

        loop {
            let read = matcher.fill(&mut buffer)?;
            if read == 0 {
                break;
            }
            results.total_hits += read as u64;

            let wanted = match limit {
                Some(limit) => limit.saturating_sub(results.hits.len()).min(read),
                None => read,
            };
            if wanted == 0 {
                continue;
            }

            matcher.score(&buffer[..wanted], &mut scores[..wanted])?;
            for (&doc_id, &score) in buffer[..wanted].iter().zip(&scores[..wanted]) {
                let external_id = self.reader.external_id(doc_id)?.map(str::to_string);
                results.max_score = results.max_score.max(score);
                results.hits.push(SearchHit {
                    doc_id,
                    external_id,
                    score,
                });
            }
        }

        Ok(results)
    }

    /// Compile `query` and collect its results.
    pub fn execute(&self, query: &QueryNode, limit: Option<usize>) -> Result<SearchResults> {
        let mut matcher = self.search(query)?;
        self.collect(matcher.as_mut(), limit)
    }
}

/// Convert a parsed `take` into a positive bound.
fn parse_take(take: Option<i64>) -> Result<Option<usize>> {
    match take {
        None => Ok(None),
        Some(k) if k <= 0 => Err(LexmatchError::query(format!(
            "take must be greater than zero, got {k}"
        ))),
        Some(k) => usize::try_from(k)
            .map(Some)
            .map_err(|_| LexmatchError::query(format!("take {k} is out of range"))),
    }
}
