//! Match evaluation and scoring.
//!
//! Every query node is a [`Matcher`]: a resumable, batched producer of
//! ascending document ids that can also test membership and score ids it
//! produced. Matchers compose into trees borrowing one [`IndexReader`].
//!
//! [`IndexReader`]: crate::full_text::IndexReader

pub mod boolean;
pub mod boost;
pub mod config;
pub mod inspect;
mod lookahead;
pub mod matcher;
pub mod multi_term;
pub mod node;
pub mod scorer;
pub mod sort;
pub mod term;
pub mod term_provider;

pub use self::boolean::{AndMatcher, AndNotMatcher, OrMatcher};
pub use self::boost::{Boost, BoostMatcher};
pub use self::config::MatchConfig;
pub use self::inspect::QueryInspectionNode;
pub use self::matcher::{
    AllMatcher, BoxedMatcher, EmptyMatcher, Matcher, NEUTRAL_SCORE, fill_all,
};
pub use self::multi_term::MultiTermMatcher;
pub use self::node::{QueryNode, ScoreFunctionSpec};
pub use self::scorer::{ConstantScore, IdfScore, ScoreContext, ScoreFunction, TermFrequencyScore};
pub use self::sort::{
    FieldComparer, FnComparer, OrderByMatcher, ScoreComparer, SortComparer, SortEntry,
};
pub use self::term::TermMatcher;
pub use self::term_provider::{InTermProvider, PredicateTermProvider, TermPredicate, TermProvider};
