//! Term providers: enumerators over the qualifying terms of one field.
//!
//! A provider yields one [`TermMatcher`] per qualifying term, in dictionary
//! order for predicate providers and in caller order for IN-lists. Multi-term
//! matches consume providers; a provider can also answer membership queries
//! directly without enumerating postings.

use std::fmt::{self, Debug};

use crate::DocId;
use crate::error::{LexmatchError, Result};
use crate::full_text::dictionary::TermInfo;
use crate::full_text::reader::{IndexReader, TermCursor};
use crate::query::inspect::QueryInspectionNode;
use crate::query::term::TermMatcher;

/// Trait for term providers.
pub trait TermProvider<'a>: Send + Debug {
    /// Rewind to the first qualifying term.
    fn reset(&mut self);

    /// The next qualifying term, or `None` once exhausted.
    ///
    /// After `None` the provider keeps returning `None` until [`reset`](Self::reset).
    fn next_term(&mut self) -> Result<Option<TermMatcher<'a>>>;

    /// Whether `doc_id` is present under any qualifying term.
    ///
    /// Does not move the enumeration position.
    fn evaluate(&mut self, doc_id: DocId) -> Result<bool>;

    /// Field the provider enumerates.
    fn field(&self) -> &str;

    /// Describe this provider.
    fn inspect(&self) -> QueryInspectionNode;
}

/// Byte-level predicate selecting terms of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPredicate {
    /// Terms beginning with the bytes.
    StartsWith(Vec<u8>),
    /// Terms not beginning with the bytes.
    NotStartsWith(Vec<u8>),
    /// Terms ending with the bytes.
    EndsWith(Vec<u8>),
    /// Terms containing the bytes.
    Contains(Vec<u8>),
    /// Terms not containing the bytes.
    NotContains(Vec<u8>),
    /// Every term of the field.
    Exists,
}

impl TermPredicate {
    /// Whether `term` qualifies.
    pub fn matches(&self, term: &[u8]) -> bool {
        match self {
            TermPredicate::StartsWith(prefix) => term.starts_with(prefix),
            TermPredicate::NotStartsWith(prefix) => !term.starts_with(prefix),
            TermPredicate::EndsWith(suffix) => term.ends_with(suffix),
            TermPredicate::Contains(needle) => contains_bytes(term, needle),
            TermPredicate::NotContains(needle) => !contains_bytes(term, needle),
            TermPredicate::Exists => true,
        }
    }

    /// Operator name used in inspection output.
    pub fn name(&self) -> &'static str {
        match self {
            TermPredicate::StartsWith(_) => "StartsWith",
            TermPredicate::NotStartsWith(_) => "NotStartsWith",
            TermPredicate::EndsWith(_) => "EndsWith",
            TermPredicate::Contains(_) => "Contains",
            TermPredicate::NotContains(_) => "NotContains",
            TermPredicate::Exists => "Exists",
        }
    }

    /// The predicate's byte operand, if any.
    pub fn operand(&self) -> Option<&[u8]> {
        match self {
            TermPredicate::StartsWith(bytes)
            | TermPredicate::NotStartsWith(bytes)
            | TermPredicate::EndsWith(bytes)
            | TermPredicate::Contains(bytes)
            | TermPredicate::NotContains(bytes) => Some(bytes),
            TermPredicate::Exists => None,
        }
    }

    fn seek_target(&self) -> Option<&[u8]> {
        match self {
            TermPredicate::StartsWith(prefix) => Some(prefix),
            _ => None,
        }
    }

    /// Whether no term after a non-qualifying `term` can qualify.
    ///
    /// Only prefixes are contiguous in dictionary order; every other
    /// predicate scans the whole field.
    fn ends_scan(&self, term: &[u8]) -> bool {
        matches!(self, TermPredicate::StartsWith(prefix) if !term.starts_with(prefix))
    }
}

impl fmt::Display for TermPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Some(bytes) => write!(f, "{}({})", self.name(), String::from_utf8_lossy(bytes)),
            None => write!(f, "{}", self.name()),
        }
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

/// Advance `cursor` to the next term satisfying `predicate`.
fn scan(
    reader: &dyn IndexReader,
    cursor: &mut dyn TermCursor,
    predicate: &TermPredicate,
) -> Result<Option<(Vec<u8>, TermInfo)>> {
    while let Some((raw, info)) = cursor.move_next()? {
        let term = reader.decode_term(raw);
        if predicate.matches(&term) {
            return Ok(Some((term.into_owned(), info)));
        }
        if predicate.ends_scan(&term) {
            return Ok(None);
        }
    }
    Ok(None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Fresh,
    Scanning,
    Exhausted,
}

/// Provider yielding the terms of a field that satisfy a [`TermPredicate`].
///
/// `StartsWith` seeks straight to the prefix and stops at the first term past
/// it. The negated and substring predicates visit every term of the field.
#[derive(Debug)]
pub struct PredicateTermProvider<'a> {
    reader: &'a dyn IndexReader,
    field: String,
    predicate: TermPredicate,
    cursor: Box<dyn TermCursor + 'a>,
    state: ScanState,
}

impl<'a> PredicateTermProvider<'a> {
    /// Create a provider. Unknown fields are a field error.
    pub fn new(reader: &'a dyn IndexReader, field: &str, predicate: TermPredicate) -> Result<Self> {
        let cursor = reader.terms(field)?;
        Ok(PredicateTermProvider {
            reader,
            field: field.to_string(),
            predicate,
            cursor,
            state: ScanState::Fresh,
        })
    }

    /// The predicate terms are tested against.
    pub fn predicate(&self) -> &TermPredicate {
        &self.predicate
    }
}

impl<'a> TermProvider<'a> for PredicateTermProvider<'a> {
    fn reset(&mut self) {
        self.cursor.reset();
        self.state = ScanState::Fresh;
    }

    fn next_term(&mut self) -> Result<Option<TermMatcher<'a>>> {
        match self.state {
            ScanState::Exhausted => return Ok(None),
            ScanState::Fresh => {
                if let Some(target) = self.predicate.seek_target() {
                    self.cursor.seek(&self.reader.encode_term(target));
                }
                self.state = ScanState::Scanning;
            }
            ScanState::Scanning => {}
        }

        match scan(self.reader, self.cursor.as_mut(), &self.predicate)? {
            Some((term, info)) => {
                let postings = self.reader.postings(&self.field, &info)?;
                Ok(Some(TermMatcher::new(self.field.as_str(), term, postings)))
            }
            None => {
                self.state = ScanState::Exhausted;
                Ok(None)
            }
        }
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        // A private cursor keeps the enumeration position untouched.
        let mut cursor = self.reader.terms(&self.field)?;
        if let Some(target) = self.predicate.seek_target() {
            cursor.seek(&self.reader.encode_term(target));
        }

        while let Some((_, info)) = scan(self.reader, cursor.as_mut(), &self.predicate)? {
            if self.reader.postings(&self.field, &info)?.contains(doc_id)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn inspect(&self) -> QueryInspectionNode {
        let node = QueryInspectionNode::new(self.predicate.name()).with_parameter("Field", &self.field);
        match self.predicate.operand() {
            Some(bytes) => node.with_parameter("Term", String::from_utf8_lossy(bytes)),
            None => node,
        }
    }
}

/// Provider yielding an explicit list of terms, in caller order.
///
/// Each value costs one dictionary lookup; values absent from the
/// dictionary are skipped.
#[derive(Debug)]
pub struct InTermProvider<'a> {
    reader: &'a dyn IndexReader,
    field: String,
    terms: Vec<Vec<u8>>,
    position: usize,
}

impl<'a> InTermProvider<'a> {
    /// Create a provider. Unknown fields are a field error.
    pub fn new<I, T>(reader: &'a dyn IndexReader, field: &str, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        if !reader.has_field(field) {
            return Err(LexmatchError::field(format!("unknown field '{field}'")));
        }

        Ok(InTermProvider {
            reader,
            field: field.to_string(),
            terms: terms.into_iter().map(Into::into).collect(),
            position: 0,
        })
    }

    /// The listed terms.
    pub fn terms(&self) -> &[Vec<u8>] {
        &self.terms
    }
}

impl<'a> TermProvider<'a> for InTermProvider<'a> {
    fn reset(&mut self) {
        self.position = 0;
    }

    fn next_term(&mut self) -> Result<Option<TermMatcher<'a>>> {
        while let Some(term) = self.terms.get(self.position) {
            self.position += 1;
            let raw = self.reader.encode_term(term);
            if let Some(info) = self.reader.lookup(&self.field, &raw)? {
                let postings = self.reader.postings(&self.field, &info)?;
                return Ok(Some(TermMatcher::new(self.field.as_str(), term.clone(), postings)));
            }
        }
        Ok(None)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        for term in &self.terms {
            let raw = self.reader.encode_term(term);
            if let Some(info) = self.reader.lookup(&self.field, &raw)? {
                if self.reader.postings(&self.field, &info)?.contains(doc_id)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn inspect(&self) -> QueryInspectionNode {
        let terms: Vec<String> = self
            .terms
            .iter()
            .map(|term| String::from_utf8_lossy(term).into_owned())
            .collect();
        QueryInspectionNode::new("In")
            .with_parameter("Field", &self.field)
            .with_parameter("Terms", terms.join(","))
    }
}
