//! Field value types for documents.
//!
//! This module defines the [`FieldValue`] enum which represents the values
//! stored in document fields. Every value has a canonical term form (the
//! bytes written to the term dictionary) and a total order used by the
//! field comparer of the ordering stage.
//!
//! ```
//! use lexmatch::document::field_value::FieldValue;
//!
//! let number = FieldValue::Integer(42);
//! assert_eq!(number.to_term_bytes(), b"42".to_vec());
//!
//! let text = FieldValue::Text("list/1".to_string());
//! assert_eq!(text.as_text(), Some("list/1"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents a value for a field in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Binary data
    Binary(Vec<u8>),
}

impl FieldValue {
    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if possible.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The bytes under which this value is stored in a term dictionary.
    ///
    /// Numbers use their decimal representation so `Integer(1)` and the
    /// query term `"1"` meet in the dictionary.
    pub fn to_term_bytes(&self) -> Vec<u8> {
        match self {
            FieldValue::Text(s) => s.as_bytes().to_vec(),
            FieldValue::Integer(i) => i.to_string().into_bytes(),
            FieldValue::Float(f) => f.to_string().into_bytes(),
            FieldValue::Boolean(b) => b.to_string().into_bytes(),
            FieldValue::Binary(data) => data.clone(),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Boolean(_) => 0,
            FieldValue::Integer(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Binary(_) => 3,
        }
    }

    /// Total order over field values.
    ///
    /// Numbers compare numerically across integer/float, text and binary
    /// compare bytewise, and values of different kinds order by kind.
    pub fn total_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (FieldValue::Binary(a), FieldValue::Binary(b)) => a.cmp(b),
            (a, b) => match (a.as_float(), b.as_float()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.type_rank().cmp(&b.type_rank()),
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Binary(data) => write!(f, "<{} bytes>", data.len()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}
