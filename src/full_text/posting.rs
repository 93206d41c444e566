//! Posting lists and posting cursors.
//!
//! A posting list is the ascending sequence of document ids for one term.
//! Lists are stored in blocks: every block starts with an absolute varint id
//! followed by varint deltas, and a skip table records where each block
//! starts. Sequential fills decode block after block; membership tests
//! binary-search the skip table and scan a single block.

use std::fmt::Debug;

use crate::DocId;
use crate::error::{LexmatchError, Result};
use crate::util::varint;

/// Location of one posting block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipEntry {
    /// First document id stored in the block.
    pub first_doc: DocId,
    /// Byte offset of the block relative to the start of its posting list.
    pub offset: u32,
    /// Number of ids in the block.
    pub count: u32,
}

/// Resumable cursor over one term's posting list.
///
/// `fill` continues from wherever the previous call stopped; `contains` is a
/// random-access membership test and never moves the fill position.
pub trait PostingCursor: Send + Debug {
    /// Copy up to `buffer.len()` ascending ids into `buffer`.
    ///
    /// Returns the number of ids written; `0` means the cursor is exhausted.
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize>;

    /// Whether `doc_id` is present in this posting list.
    fn contains(&mut self, doc_id: DocId) -> Result<bool>;

    /// Rewind to the first id.
    fn reset(&mut self);

    /// Number of documents in the posting list.
    fn doc_freq(&self) -> u64;
}

/// Encode an ascending id list into `out`, appending one skip entry per block to `skips`.
///
/// Offsets in the skip entries are relative to the length `out` had on entry.
pub fn encode_postings(
    docs: &[DocId],
    block_size: usize,
    out: &mut Vec<u8>,
    skips: &mut Vec<SkipEntry>,
) -> Result<()> {
    if block_size == 0 {
        return Err(LexmatchError::invalid_config(
            "posting block size must be greater than zero",
        ));
    }
    if docs.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(LexmatchError::index(
            "posting list must be strictly ascending",
        ));
    }

    let base = out.len();
    for block in docs.chunks(block_size) {
        let offset = u32::try_from(out.len() - base)
            .map_err(|_| LexmatchError::index("posting list exceeds 4 GiB"))?;
        skips.push(SkipEntry {
            first_doc: block[0],
            offset,
            count: block.len() as u32,
        });

        varint::write_u64(out, block[0]);
        for pair in block.windows(2) {
            varint::write_u64(out, pair[1] - pair[0]);
        }
    }

    Ok(())
}

/// Posting cursor over a block-encoded posting list borrowed from the index.
#[derive(Debug, Clone)]
pub struct BlockPostingCursor<'a> {
    data: &'a [u8],
    skips: &'a [SkipEntry],
    /// Next block to open once the current one is consumed.
    next_block: usize,
    /// Read offset into `data`.
    offset: usize,
    /// Ids left to decode in the current block.
    remaining: u32,
    last: DocId,
    doc_freq: u64,
}

impl<'a> BlockPostingCursor<'a> {
    /// Create a cursor over `data` described by `skips`.
    pub fn new(data: &'a [u8], skips: &'a [SkipEntry]) -> Self {
        let doc_freq = skips.iter().map(|entry| entry.count as u64).sum();
        BlockPostingCursor {
            data,
            skips,
            next_block: 0,
            offset: 0,
            remaining: 0,
            last: 0,
            doc_freq,
        }
    }

    fn decode_at(data: &[u8], offset: usize) -> Result<(u64, usize)> {
        let tail = data
            .get(offset..)
            .ok_or_else(|| LexmatchError::storage("posting offset out of bounds"))?;
        varint::decode_u64(tail)
    }
}

impl PostingCursor for BlockPostingCursor<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        let mut written = 0;

        while written < buffer.len() {
            if self.remaining == 0 {
                let Some(entry) = self.skips.get(self.next_block) else {
                    break;
                };
                self.next_block += 1;

                let (first, used) = Self::decode_at(self.data, entry.offset as usize)?;
                self.offset = entry.offset as usize + used;
                self.remaining = entry.count - 1;
                self.last = first;
            } else {
                let (delta, used) = Self::decode_at(self.data, self.offset)?;
                self.offset += used;
                self.remaining -= 1;
                self.last += delta;
            }

            buffer[written] = self.last;
            written += 1;
        }

        Ok(written)
    }

    fn contains(&mut self, doc_id: DocId) -> Result<bool> {
        let block = self.skips.partition_point(|entry| entry.first_doc <= doc_id);
        if block == 0 {
            return Ok(false);
        }

        let entry = self.skips[block - 1];
        let (mut current, used) = Self::decode_at(self.data, entry.offset as usize)?;
        let mut offset = entry.offset as usize + used;

        for _ in 1..entry.count {
            if current >= doc_id {
                break;
            }
            let (delta, used) = Self::decode_at(self.data, offset)?;
            offset += used;
            current += delta;
        }

        Ok(current == doc_id)
    }

    fn reset(&mut self) {
        self.next_block = 0;
        self.offset = 0;
        self.remaining = 0;
        self.last = 0;
    }

    fn doc_freq(&self) -> u64 {
        self.doc_freq
    }
}
