//! In-memory index build path.
//!
//! The writer assigns dense, ascending document ids in insertion order,
//! indexes every field value as one keyword term and the external id under
//! the configured id field, and encodes postings on commit.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::DocId;
use crate::document::Document;
use crate::error::Result;
use crate::full_text::config::IndexConfig;
use crate::full_text::dictionary::{SortedTermDictionary, TermInfo};
use crate::full_text::memory::{FieldIndex, MemoryIndex};
use crate::full_text::posting::encode_postings;

/// Builds a [`MemoryIndex`].
#[derive(Debug)]
pub struct MemoryIndexWriter {
    config: IndexConfig,
    documents: Vec<Document>,
    /// field -> term -> ascending doc ids
    postings: AHashMap<String, BTreeMap<Vec<u8>, Vec<DocId>>>,
}

impl MemoryIndexWriter {
    /// Create a writer with the given configuration.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(MemoryIndexWriter {
            config,
            documents: Vec::new(),
            postings: AHashMap::new(),
        })
    }

    /// The writer configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of documents added so far.
    pub fn doc_count(&self) -> u64 {
        self.documents.len() as u64
    }

    /// Add a document and return its internal id.
    pub fn add_document(&mut self, document: Document) -> Result<DocId> {
        let doc_id = self.documents.len() as DocId;

        let id_term = document.id().as_bytes().to_vec();
        let id_field = self.config.id_field.clone();
        self.add_term(&id_field, id_term, doc_id);

        for (field, value) in document.fields() {
            self.add_term(field, value.to_term_bytes(), doc_id);
        }

        self.documents.push(document);
        Ok(doc_id)
    }

    fn add_term(&mut self, field: &str, term: Vec<u8>, doc_id: DocId) {
        let docs = self
            .postings
            .entry(field.to_string())
            .or_default()
            .entry(term)
            .or_default();

        // Ids arrive in ascending order; a repeated value in one document is indexed once.
        if docs.last() != Some(&doc_id) {
            docs.push(doc_id);
        }
    }

    /// Encode all postings and produce the read-only snapshot.
    pub fn commit(self) -> Result<MemoryIndex> {
        let block_size = self.config.posting_block_size;
        let mut fields = AHashMap::with_capacity(self.postings.len());
        let mut term_count = 0usize;

        for (field, terms) in self.postings {
            let mut index = FieldIndex::default();
            let mut entries = Vec::with_capacity(terms.len());

            for (term, docs) in terms {
                let posting_offset = index.postings.len() as u64;
                let skip_offset = index.skips.len() as u32;

                encode_postings(&docs, block_size, &mut index.postings, &mut index.skips)?;

                entries.push((
                    term,
                    TermInfo {
                        posting_offset,
                        posting_length: index.postings.len() as u64 - posting_offset,
                        skip_offset,
                        skip_count: index.skips.len() as u32 - skip_offset,
                        doc_frequency: docs.len() as u64,
                    },
                ));
            }

            term_count += entries.len();
            index.dictionary = SortedTermDictionary::from_entries(entries);
            fields.insert(field, index);
        }

        log::debug!(
            "committed index snapshot: {} documents, {} fields, {} terms",
            self.documents.len(),
            fields.len(),
            term_count
        );

        Ok(MemoryIndex {
            fields,
            documents: self.documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;
    use crate::full_text::reader::IndexReader;

    fn build() -> MemoryIndex {
        let mut writer =
            MemoryIndexWriter::new(IndexConfig::default().with_posting_block_size(2)).unwrap();
        for (id, value) in [("a/1", 1), ("a/2", 0), ("b/1", 1), ("b/2", 1), ("c/1", 2)] {
            writer
                .add_document(Document::builder(id).add_integer("n", value).build())
                .unwrap();
        }
        writer.commit().unwrap()
    }

    fn drain(cursor: &mut dyn crate::full_text::posting::PostingCursor) -> Vec<DocId> {
        let mut out = Vec::new();
        let mut buffer = [0; 3];
        loop {
            let read = cursor.fill(&mut buffer).unwrap();
            if read == 0 {
                return out;
            }
            out.extend_from_slice(&buffer[..read]);
        }
    }

    #[test]
    fn test_dense_ids_and_postings() {
        let index = build();
        assert_eq!(index.doc_count(), 5);
        assert!(index.has_field("id") && index.has_field("n"));
        assert!(!index.has_field("missing"));

        let info = index.lookup("n", b"1").unwrap().unwrap();
        assert_eq!(info.doc_frequency, 3);
        assert_eq!(info.skip_count, 2);

        let mut cursor = index.postings("n", &info).unwrap();
        assert_eq!(drain(cursor.as_mut()), vec![0, 2, 3]);
        assert!(cursor.contains(3).unwrap());
        assert!(!cursor.contains(1).unwrap());
    }

    #[test]
    fn test_terms_are_ordered_per_field() {
        let index = build();
        let mut cursor = index.terms("id").unwrap();
        let mut terms = Vec::new();
        while let Some((term, _)) = cursor.move_next().unwrap() {
            terms.push(term.to_vec());
        }
        assert_eq!(
            terms,
            vec![
                b"a/1".to_vec(),
                b"a/2".to_vec(),
                b"b/1".to_vec(),
                b"b/2".to_vec(),
                b"c/1".to_vec()
            ]
        );
    }

    #[test]
    fn test_unknown_field_is_error() {
        let index = build();
        assert!(index.terms("missing").is_err());
        assert!(index.lookup("missing", b"x").unwrap_err().is_configuration());
        assert!(index.lookup("n", b"42").unwrap().is_none());
    }

    #[test]
    fn test_document_lookups() {
        let index = build();
        assert_eq!(index.external_id(2).unwrap(), Some("b/1"));
        assert_eq!(index.external_id(99).unwrap(), None);
        assert_eq!(index.read_field(4, "n").unwrap(), Some(FieldValue::Integer(2)));
        assert_eq!(index.read_field(4, "missing").unwrap(), None);
    }

    #[test]
    fn test_repeated_value_indexed_once() {
        let mut writer = MemoryIndexWriter::new(IndexConfig::default()).unwrap();
        writer
            .add_document(
                Document::builder("x")
                    .add_text("tag", "red")
                    .add_text("tag", "red")
                    .add_text("tag", "blue")
                    .build(),
            )
            .unwrap();
        let index = writer.commit().unwrap();

        assert_eq!(index.term_doc_freq("tag", b"red").unwrap(), 1);
        assert_eq!(index.term_doc_freq("tag", b"blue").unwrap(), 1);
    }
}
