//! Term dictionary for term-to-posting lookup.
//!
//! Terms are opaque byte strings kept in ascending lexicographic byte
//! order. A sorted array serves ordered iteration and prefix seeks, and an
//! ahash map serves exact lookups.

use ahash::AHashMap;

use crate::error::Result;
use crate::full_text::reader::TermCursor;

/// Information about a term in the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermInfo {
    /// Offset of the posting list in the field's posting bytes.
    pub posting_offset: u64,
    /// Length of the posting list in bytes.
    pub posting_length: u64,
    /// Index of the first skip entry of this posting list.
    pub skip_offset: u32,
    /// Number of skip entries (posting blocks).
    pub skip_count: u32,
    /// Document frequency (number of documents containing this term).
    pub doc_frequency: u64,
}

/// A sorted array-based term dictionary with a hash index for exact lookups.
#[derive(Debug, Clone, Default)]
pub struct SortedTermDictionary {
    /// Sorted terms.
    terms: Vec<Vec<u8>>,
    /// Term info for each term (parallel array).
    term_infos: Vec<TermInfo>,
    /// Exact-match index into `terms`.
    positions: AHashMap<Vec<u8>, usize>,
}

impl SortedTermDictionary {
    /// Create a new empty sorted term dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from `(term, info)` pairs; the pairs are sorted by term bytes.
    ///
    /// Later duplicates of a term replace earlier ones.
    pub fn from_entries(mut entries: Vec<(Vec<u8>, TermInfo)>) -> Self {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                earlier.1 = later.1;
                true
            } else {
                false
            }
        });

        let mut terms = Vec::with_capacity(entries.len());
        let mut term_infos = Vec::with_capacity(entries.len());
        let mut positions = AHashMap::with_capacity(entries.len());

        for (index, (term, info)) in entries.into_iter().enumerate() {
            positions.insert(term.clone(), index);
            terms.push(term);
            term_infos.push(info);
        }

        SortedTermDictionary {
            terms,
            term_infos,
            positions,
        }
    }

    /// Look up a term and return its info.
    pub fn get(&self, term: &[u8]) -> Option<&TermInfo> {
        self.positions
            .get(term)
            .map(|&index| &self.term_infos[index])
    }

    /// Position of the first term that is `>= term`.
    pub fn lower_bound(&self, term: &[u8]) -> usize {
        self.terms.partition_point(|candidate| candidate.as_slice() < term)
    }

    /// The entry at `position`, if any.
    pub fn entry(&self, position: usize) -> Option<(&[u8], &TermInfo)> {
        let term = self.terms.get(position)?;
        Some((term.as_slice(), &self.term_infos[position]))
    }

    /// Get the number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// A fresh cursor positioned before the first term.
    pub fn cursor(&self) -> DictionaryTermCursor<'_> {
        DictionaryTermCursor {
            dictionary: self,
            position: 0,
        }
    }
}

/// Ordered cursor over a [`SortedTermDictionary`].
#[derive(Debug, Clone)]
pub struct DictionaryTermCursor<'a> {
    dictionary: &'a SortedTermDictionary,
    position: usize,
}

impl TermCursor for DictionaryTermCursor<'_> {
    fn reset(&mut self) {
        self.position = 0;
    }

    fn seek(&mut self, term: &[u8]) {
        self.position = self.dictionary.lower_bound(term);
    }

    fn move_next(&mut self) -> Result<Option<(&[u8], TermInfo)>> {
        match self.dictionary.entry(self.position) {
            Some((term, info)) => {
                self.position += 1;
                Ok(Some((term, *info)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(doc_frequency: u64) -> TermInfo {
        TermInfo {
            posting_offset: 0,
            posting_length: 0,
            skip_offset: 0,
            skip_count: 0,
            doc_frequency,
        }
    }

    fn sample() -> SortedTermDictionary {
        SortedTermDictionary::from_entries(vec![
            (b"list/2".to_vec(), info(2)),
            (b"list/1".to_vec(), info(1)),
            (b"list/11".to_vec(), info(11)),
            (b"apple".to_vec(), info(5)),
            (b"list/3".to_vec(), info(3)),
        ])
    }

    fn all_terms(dict: &SortedTermDictionary) -> Vec<Vec<u8>> {
        let mut cursor = dict.cursor();
        let mut terms = Vec::new();
        while let Some((term, _)) = cursor.move_next().unwrap() {
            terms.push(term.to_vec());
        }
        terms
    }

    #[test]
    fn test_sorted_order_and_lookup() {
        let dict = sample();
        let terms = all_terms(&dict);
        assert_eq!(
            terms,
            vec![
                b"apple".as_slice(),
                b"list/1",
                b"list/11",
                b"list/2",
                b"list/3"
            ]
        );

        assert_eq!(dict.get(b"list/11").unwrap().doc_frequency, 11);
        assert!(dict.get(b"list/4").is_none());
        assert_eq!(dict.len(), 5);
    }

    #[test]
    fn test_duplicate_terms_keep_last() {
        let dict = SortedTermDictionary::from_entries(vec![
            (b"a".to_vec(), info(1)),
            (b"a".to_vec(), info(2)),
        ]);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(b"a").unwrap().doc_frequency, 2);
    }

    #[test]
    fn test_cursor_seek_and_reset() {
        let dict = sample();
        let mut cursor = dict.cursor();

        cursor.seek(b"list/10");
        let (term, _) = cursor.move_next().unwrap().unwrap();
        assert_eq!(term, b"list/11");

        cursor.reset();
        let (term, info) = cursor.move_next().unwrap().unwrap();
        assert_eq!(term, b"apple");
        assert_eq!(info.doc_frequency, 5);

        cursor.seek(b"zzz");
        assert!(cursor.move_next().unwrap().is_none());
    }
}
