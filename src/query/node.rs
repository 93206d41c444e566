//! Parsed query structure.
//!
//! [`QueryNode`] is the serializable description of a match tree that an API
//! layer hands to
//! [`IndexSearcher::search`](crate::full_text_search::IndexSearcher::search).
//! It carries no index state; compiling it validates fields and parameters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::scorer::{ConstantScore, IdfScore, ScoreFunction, TermFrequencyScore};

/// Serializable choice of score function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreFunctionSpec {
    /// [`ConstantScore`].
    Constant { value: f32 },
    /// [`TermFrequencyScore`].
    TermFrequency,
    /// [`IdfScore`].
    Idf,
}

impl ScoreFunctionSpec {
    /// Instantiate the score function.
    pub fn build(&self) -> Arc<dyn ScoreFunction> {
        match self {
            ScoreFunctionSpec::Constant { value } => Arc::new(ConstantScore::new(*value)),
            ScoreFunctionSpec::TermFrequency => Arc::new(TermFrequencyScore::new()),
            ScoreFunctionSpec::Idf => Arc::new(IdfScore::new()),
        }
    }
}

/// A query tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryNode {
    /// Exact term equality.
    Term { field: String, value: String },
    /// Terms starting with `prefix`.
    StartsWith {
        field: String,
        prefix: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Terms not starting with `prefix`.
    NotStartsWith {
        field: String,
        prefix: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Terms ending with `suffix`.
    EndsWith {
        field: String,
        suffix: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Terms containing `value`.
    Contains {
        field: String,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Terms not containing `value`.
    NotContains {
        field: String,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Documents with any term in `field`.
    Exists {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Documents matching any of `values`.
    In {
        field: String,
        values: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<ScoreFunctionSpec>,
    },
    /// Every document.
    All,
    /// Intersection.
    And { children: Vec<QueryNode> },
    /// Union.
    Or { children: Vec<QueryNode> },
    /// `base` minus `exclusion`.
    AndNot {
        base: Box<QueryNode>,
        exclusion: Box<QueryNode>,
    },
    /// Constant boost.
    Boost { child: Box<QueryNode>, boost: f32 },
    /// Score-function boost.
    BoostBy {
        child: Box<QueryNode>,
        function: ScoreFunctionSpec,
    },
    /// Order by score, highest first unless `ascending`.
    OrderByScore {
        child: Box<QueryNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        take: Option<i64>,
        #[serde(default)]
        ascending: bool,
    },
    /// Order by a stored field value, missing values last.
    OrderByField {
        child: Box<QueryNode>,
        field: String,
        #[serde(default)]
        descending: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        take: Option<i64>,
    },
}

impl QueryNode {
    /// Parse a JSON query tree.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn term<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        QueryNode::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn starts_with<F: Into<String>, P: Into<String>>(field: F, prefix: P) -> Self {
        QueryNode::StartsWith {
            field: field.into(),
            prefix: prefix.into(),
            score: None,
        }
    }

    pub fn not_starts_with<F: Into<String>, P: Into<String>>(field: F, prefix: P) -> Self {
        QueryNode::NotStartsWith {
            field: field.into(),
            prefix: prefix.into(),
            score: None,
        }
    }

    pub fn ends_with<F: Into<String>, S: Into<String>>(field: F, suffix: S) -> Self {
        QueryNode::EndsWith {
            field: field.into(),
            suffix: suffix.into(),
            score: None,
        }
    }

    pub fn contains<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        QueryNode::Contains {
            field: field.into(),
            value: value.into(),
            score: None,
        }
    }

    pub fn exists<F: Into<String>>(field: F) -> Self {
        QueryNode::Exists {
            field: field.into(),
            score: None,
        }
    }

    pub fn in_list<F, I, V>(field: F, values: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        QueryNode::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            score: None,
        }
    }

    pub fn and(children: Vec<QueryNode>) -> Self {
        QueryNode::And { children }
    }

    pub fn or(children: Vec<QueryNode>) -> Self {
        QueryNode::Or { children }
    }

    pub fn and_not(self, exclusion: QueryNode) -> Self {
        QueryNode::AndNot {
            base: Box::new(self),
            exclusion: Box::new(exclusion),
        }
    }

    pub fn boost(self, boost: f32) -> Self {
        QueryNode::Boost {
            child: Box::new(self),
            boost,
        }
    }

    pub fn boost_by(self, function: ScoreFunctionSpec) -> Self {
        QueryNode::BoostBy {
            child: Box::new(self),
            function,
        }
    }

    /// Attach a per-term score function to a multi-term node.
    ///
    /// Other nodes are returned unchanged.
    pub fn scored_by(mut self, function: ScoreFunctionSpec) -> Self {
        match &mut self {
            QueryNode::StartsWith { score, .. }
            | QueryNode::NotStartsWith { score, .. }
            | QueryNode::EndsWith { score, .. }
            | QueryNode::Contains { score, .. }
            | QueryNode::NotContains { score, .. }
            | QueryNode::Exists { score, .. }
            | QueryNode::In { score, .. } => *score = Some(function),
            _ => {}
        }
        self
    }

    pub fn order_by_score(self, take: Option<i64>) -> Self {
        QueryNode::OrderByScore {
            child: Box::new(self),
            take,
            ascending: false,
        }
    }

    pub fn order_by_field<F: Into<String>>(self, field: F, descending: bool, take: Option<i64>) -> Self {
        QueryNode::OrderByField {
            child: Box::new(self),
            field: field.into(),
            descending,
            take,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_tree() {
        let json = r#"{
            "type": "order_by_score",
            "take": 4,
            "child": {
                "type": "or",
                "children": [
                    {"type": "term", "field": "Content1", "value": "2"},
                    {
                        "type": "boost",
                        "boost": 10.0,
                        "child": {"type": "starts_with", "field": "id", "prefix": "list/1"}
                    },
                    {"type": "in", "field": "Content1", "values": ["0", "1"],
                     "score": {"type": "term_frequency"}}
                ]
            }
        }"#;

        let node = QueryNode::from_json(json).unwrap();
        let expected = QueryNode::or(vec![
            QueryNode::term("Content1", "2"),
            QueryNode::starts_with("id", "list/1").boost(10.0),
            QueryNode::in_list("Content1", ["0", "1"]).scored_by(ScoreFunctionSpec::TermFrequency),
        ])
        .order_by_score(Some(4));

        assert_eq!(node, expected);
    }

    #[test]
    fn test_json_round_trip_keeps_structure() {
        let node = QueryNode::All
            .and_not(QueryNode::not_starts_with("id", "a"))
            .boost_by(ScoreFunctionSpec::Constant { value: 2.0 })
            .order_by_field("rank", true, None);

        let json = node.to_json().unwrap();
        assert!(json.contains(r#""type":"order_by_field""#));
        assert_eq!(QueryNode::from_json(&json).unwrap(), node);
    }

    #[test]
    fn test_unknown_node_type() {
        assert!(QueryNode::from_json(r#"{"type": "fuzzy", "field": "a"}"#).is_err());
    }

    #[test]
    fn test_score_function_spec_build() {
        assert_eq!(ScoreFunctionSpec::Idf.build().name(), "Idf");
        assert_eq!(
            ScoreFunctionSpec::Constant { value: 1.5 }.build().name(),
            "Constant"
        );
    }
}
