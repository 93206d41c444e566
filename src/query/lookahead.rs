//! Per-child lookahead buffers and the heap-driven union merge.
//!
//! Union-style matchers (Or, multi-term) pull each child in batches into a
//! small buffer and merge the buffered heads through a min-heap keyed by
//! document id, so each child fill is amortized over a whole batch.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::DocId;
use crate::error::Result;
use crate::query::matcher::Matcher;

/// A child matcher with a buffered window of its upcoming ids.
#[derive(Debug)]
pub(crate) struct Lookahead<M> {
    matcher: M,
    buffer: Vec<DocId>,
    pos: usize,
    len: usize,
    exhausted: bool,
}

impl<M: Matcher> Lookahead<M> {
    pub(crate) fn new(matcher: M, batch_size: usize) -> Self {
        Lookahead {
            matcher,
            buffer: vec![0; batch_size.max(1)],
            pos: 0,
            len: 0,
            exhausted: false,
        }
    }

    /// The smallest id not yet consumed, refilling the window when empty.
    pub(crate) fn head(&mut self) -> Result<Option<DocId>> {
        if self.pos == self.len {
            if self.exhausted {
                return Ok(None);
            }
            self.len = self.matcher.fill(&mut self.buffer)?;
            self.pos = 0;
            if self.len == 0 {
                self.exhausted = true;
                return Ok(None);
            }
        }
        Ok(Some(self.buffer[self.pos]))
    }

    /// Consume the current head.
    pub(crate) fn advance(&mut self) {
        if self.pos < self.len {
            self.pos += 1;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.matcher.reset();
        self.pos = 0;
        self.len = 0;
        self.exhausted = false;
    }

    pub(crate) fn matcher(&self) -> &M {
        &self.matcher
    }

    pub(crate) fn matcher_mut(&mut self) -> &mut M {
        &mut self.matcher
    }
}

/// Ascending, de-duplicated merge of several ascending children.
#[derive(Debug)]
pub(crate) struct Union<M> {
    children: Vec<Lookahead<M>>,
    heap: BinaryHeap<Reverse<(DocId, usize)>>,
    primed: bool,
}

impl<M: Matcher> Union<M> {
    pub(crate) fn new(children: Vec<M>, batch_size: usize) -> Self {
        let heap = BinaryHeap::with_capacity(children.len());
        Union {
            children: children
                .into_iter()
                .map(|child| Lookahead::new(child, batch_size))
                .collect(),
            heap,
            primed: false,
        }
    }

    fn prime(&mut self) -> Result<()> {
        for (index, child) in self.children.iter_mut().enumerate() {
            if let Some(head) = child.head()? {
                self.heap.push(Reverse((head, index)));
            }
        }
        self.primed = true;
        Ok(())
    }

    /// Emit the next ascending ids. An id present in several children is
    /// emitted once and every child positioned on it advances.
    pub(crate) fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        if !self.primed {
            self.prime()?;
        }

        let mut written = 0;
        while written < buffer.len() {
            let Some(&Reverse((doc, _))) = self.heap.peek() else {
                break;
            };
            buffer[written] = doc;
            written += 1;

            while let Some(&Reverse((head, index))) = self.heap.peek() {
                if head != doc {
                    break;
                }
                self.heap.pop();

                let child = &mut self.children[index];
                child.advance();
                if let Some(next) = child.head()? {
                    self.heap.push(Reverse((next, index)));
                }
            }
        }

        Ok(written)
    }

    pub(crate) fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
        self.heap.clear();
        self.primed = false;
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = &M> {
        self.children.iter().map(Lookahead::matcher)
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut M> {
        self.children.iter_mut().map(Lookahead::matcher_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::matcher::AllMatcher;

    #[test]
    fn test_lookahead_refills() {
        let mut lookahead = Lookahead::new(AllMatcher::new(5), 2);
        let mut seen = Vec::new();

        while let Some(doc) = lookahead.head().unwrap() {
            seen.push(doc);
            lookahead.advance();
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(lookahead.head().unwrap(), None);

        lookahead.reset();
        assert_eq!(lookahead.head().unwrap(), Some(0));
    }

    #[test]
    fn test_union_dedups_overlapping_children() {
        let mut union = Union::new(
            vec![AllMatcher::new(3), AllMatcher::new(5), AllMatcher::new(0)],
            2,
        );
        let mut buffer = [0; 3];
        let mut out = Vec::new();
        loop {
            let read = union.fill(&mut buffer).unwrap();
            if read == 0 {
                break;
            }
            out.extend_from_slice(&buffer[..read]);
        }

        assert_eq!(out, vec![0, 1, 2, 3, 4]);
        assert_eq!(union.len(), 3);

        union.reset();
        assert_eq!(union.fill(&mut buffer).unwrap(), 3);
        assert_eq!(buffer, [0, 1, 2]);
    }
}
