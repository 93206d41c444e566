//! Single-term matching over one posting list.

use crate::DocId;
use crate::error::Result;
use crate::full_text::posting::PostingCursor;
use crate::full_text::reader::IndexReader;
use crate::query::inspect::QueryInspectionNode;
use crate::query::matcher::{Matcher, NEUTRAL_SCORE, check_score_buffers};

/// A matcher over the documents containing one exact term.
///
/// Like Lucene's TermQuery this performs exact byte matching and does not
/// analyze the term.
#[derive(Debug)]
pub struct TermMatcher<'a> {
    field: String,
    term: Vec<u8>,
    /// `None` when the term is absent from the dictionary.
    cursor: Option<Box<dyn PostingCursor + 'a>>,
}

impl<'a> TermMatcher<'a> {
    /// Wrap an open posting cursor.
    pub fn new<F, T>(field: F, term: T, cursor: Box<dyn PostingCursor + 'a>) -> Self
    where
        F: Into<String>,
        T: Into<Vec<u8>>,
    {
        TermMatcher {
            field: field.into(),
            term: term.into(),
            cursor: Some(cursor),
        }
    }

    /// A term matcher for a term with no postings.
    pub fn empty<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<Vec<u8>>,
    {
        TermMatcher {
            field: field.into(),
            term: term.into(),
            cursor: None,
        }
    }

    /// Look the term up and open its postings.
    ///
    /// Fails for unknown fields; an unknown term yields an empty matcher.
    pub fn open(reader: &'a dyn IndexReader, field: &str, term: &[u8]) -> Result<Self> {
        match reader.lookup(field, &reader.encode_term(term))? {
            Some(info) => Ok(Self::new(field, term, reader.postings(field, &info)?)),
            None => Ok(Self::empty(field, term)),
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the raw term bytes.
    pub fn term(&self) -> &[u8] {
        &self.term
    }

    /// Number of documents containing the term.
    pub fn doc_freq(&self) -> u64 {
        self.cursor.as_ref().map_or(0, |cursor| cursor.doc_freq())
    }
}

impl Matcher for TermMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        match self.cursor.as_mut() {
            Some(cursor) => cursor.fill(buffer),
            None => Ok(0),
        }
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        match self.cursor.as_mut() {
            Some(cursor) => cursor.contains(doc_id),
            None => Ok(false),
        }
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        check_score_buffers(doc_ids, scores)?;
        scores.fill(NEUTRAL_SCORE);
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.reset();
        }
    }

    fn cost(&self) -> u64 {
        self.doc_freq()
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("TermMatch")
            .with_parameter("Field", &self.field)
            .with_parameter("Term", String::from_utf8_lossy(&self.term))
            .with_parameter("TermFrequency", self.doc_freq())
    }
}
