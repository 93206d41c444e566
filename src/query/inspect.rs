//! Query inspection nodes for diagnostics and explain output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Read-only description of one node of a match tree.
///
/// Inspection has no effect on evaluation; it is rebuilt on demand from the
/// parameters a matcher was constructed with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryInspectionNode {
    /// Operator name, e.g. `TermMatch` or `OrMatch`.
    pub operation: String,
    /// Construction parameters, sorted by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<QueryInspectionNode>,
}

impl QueryInspectionNode {
    /// Create a node with no parameters.
    pub fn new<S: Into<String>>(operation: S) -> Self {
        QueryInspectionNode {
            operation: operation.into(),
            parameters: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.parameters.insert(key.into(), value.to_string());
        self
    }

    /// Add a child node.
    pub fn with_child(mut self, child: QueryInspectionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child nodes.
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = QueryInspectionNode>,
    {
        self.children.extend(children);
        self
    }

    /// Look up a parameter.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

impl fmt::Display for QueryInspectionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;

        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "[{}]", params.join(", "))?;
        }

        if !self.children.is_empty() {
            write!(f, "(")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{child}")?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}
