//! Read-only index interfaces consumed by the matching engine.
//!
//! [`IndexReader`] is the term dictionary adapter: ordered term iteration per
//! field, exact lookups, posting cursor acquisition and term decoding, plus
//! the two document lookups used when presenting or ordering results. The
//! engine never mutates anything behind these traits.

use std::borrow::Cow;
use std::fmt::Debug;

use crate::DocId;
use crate::document::FieldValue;
use crate::error::Result;
use crate::full_text::dictionary::TermInfo;
use crate::full_text::posting::PostingCursor;

/// Ordered cursor over one field's terms.
pub trait TermCursor: Send + Debug {
    /// Rewind to the first term of the field.
    fn reset(&mut self);

    /// Position the cursor so the next term returned is the first `>= term`.
    fn seek(&mut self, term: &[u8]);

    /// Advance to the next term, returning its raw bytes and posting location.
    fn move_next(&mut self) -> Result<Option<(&[u8], TermInfo)>>;
}

/// Trait for index readers.
pub trait IndexReader: Send + Sync + Debug {
    /// Get the number of documents in the index.
    fn doc_count(&self) -> u64;

    /// Whether the field has a term dictionary.
    fn has_field(&self, field: &str) -> bool;

    /// A fresh cursor over the field's terms in ascending byte order.
    ///
    /// Unknown fields are a field error.
    fn terms(&self, field: &str) -> Result<Box<dyn TermCursor + '_>>;

    /// Look up the posting location of an exact term in its raw form.
    ///
    /// Unknown fields are a field error; unknown terms are `Ok(None)`.
    fn lookup(&self, field: &str, term: &[u8]) -> Result<Option<TermInfo>>;

    /// Open a posting cursor for a location returned by `lookup` or `terms`.
    fn postings(&self, field: &str, info: &TermInfo) -> Result<Box<dyn PostingCursor + '_>>;

    /// Decode a term's raw dictionary bytes into comparable bytes.
    ///
    /// Decoding must preserve byte order, so that cursor order is also
    /// decoded order and a decoded prefix stays contiguous.
    fn decode_term<'t>(&self, raw: &'t [u8]) -> Cow<'t, [u8]> {
        Cow::Borrowed(raw)
    }

    /// Inverse of [`decode_term`](Self::decode_term): the raw form used for
    /// `lookup` and `TermCursor::seek`.
    fn encode_term<'t>(&self, term: &'t [u8]) -> Cow<'t, [u8]> {
        Cow::Borrowed(term)
    }

    /// The caller-visible identifier of a document.
    fn external_id(&self, doc_id: DocId) -> Result<Option<&str>>;

    /// The first stored value of a document's field.
    fn read_field(&self, doc_id: DocId, field: &str) -> Result<Option<FieldValue>>;

    /// Get document frequency for a specific term in a field.
    fn term_doc_freq(&self, field: &str, term: &[u8]) -> Result<u64> {
        match self.lookup(field, term)? {
            Some(info) => Ok(info.doc_frequency),
            None => Ok(0),
        }
    }
}
