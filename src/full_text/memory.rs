//! Immutable in-memory index snapshot.

use ahash::AHashMap;

use crate::DocId;
use crate::document::{Document, FieldValue};
use crate::error::{LexmatchError, Result};
use crate::full_text::dictionary::{SortedTermDictionary, TermInfo};
use crate::full_text::posting::{BlockPostingCursor, PostingCursor, SkipEntry};
use crate::full_text::reader::{IndexReader, TermCursor};

/// Term dictionary and encoded postings of one field.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    pub(crate) dictionary: SortedTermDictionary,
    pub(crate) postings: Vec<u8>,
    pub(crate) skips: Vec<SkipEntry>,
}

/// A read-only index snapshot produced by
/// [`MemoryIndexWriter::commit`](crate::full_text::writer::MemoryIndexWriter::commit).
///
/// The snapshot never changes after commit, so any number of queries may
/// read it concurrently.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    pub(crate) fields: AHashMap<String, FieldIndex>,
    pub(crate) documents: Vec<Document>,
}

impl MemoryIndex {
    fn field(&self, field: &str) -> Result<&FieldIndex> {
        self.fields
            .get(field)
            .ok_or_else(|| LexmatchError::field(format!("unknown field '{field}'")))
    }


    /// The stored document for an internal id.
    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        usize::try_from(doc_id)
            .ok()
            .and_then(|index| self.documents.get(index))
    }
}

impl IndexReader for MemoryIndex {
    fn doc_count(&self) -> u64 {
        self.documents.len() as u64
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn terms(&self, field: &str) -> Result<Box<dyn TermCursor + '_>> {
        Ok(Box::new(self.field(field)?.dictionary.cursor()))
    }

    fn lookup(&self, field: &str, term: &[u8]) -> Result<Option<TermInfo>> {
        Ok(self.field(field)?.dictionary.get(term).copied())
    }

    fn postings(&self, field: &str, info: &TermInfo) -> Result<Box<dyn PostingCursor + '_>> {
        let index = self.field(field)?;

        let start = info.posting_offset as usize;
        let end = start + info.posting_length as usize;
        let data = index
            .postings
            .get(start..end)
            .ok_or_else(|| LexmatchError::storage(format!("posting range {start}..{end} out of bounds")))?;

        let skip_start = info.skip_offset as usize;
        let skip_end = skip_start + info.skip_count as usize;
        let skips = index.skips.get(skip_start..skip_end).ok_or_else(|| {
            LexmatchError::storage(format!("skip range {skip_start}..{skip_end} out of bounds"))
        })?;

        Ok(Box::new(BlockPostingCursor::new(data, skips)))
    }

    fn external_id(&self, doc_id: DocId) -> Result<Option<&str>> {
        Ok(self.document(doc_id).map(Document::id))
    }

    fn read_field(&self, doc_id: DocId, field: &str) -> Result<Option<FieldValue>> {
        Ok(self
            .document(doc_id)
            .and_then(|doc| doc.get_field(field))
            .cloned())
    }
}
