//! Ordering stage: materialize a match and serve it sorted.
//!
//! This is the only matcher whose output is not in ascending id order, so it
//! may only appear at the root of a match tree. It buffers the wrapped match
//! completely, or only the best `take` entries when bounded.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::DocId;
use crate::document::FieldValue;
use crate::error::{LexmatchError, Result};
use crate::full_text::reader::IndexReader;
use crate::query::config::MatchConfig;
use crate::query::inspect::QueryInspectionNode;
use crate::query::matcher::{BoxedMatcher, Matcher};

/// One drained match with the keys comparers may look at.
#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    /// The matching document.
    pub doc_id: DocId,
    /// Score of the document, when the comparer asked for scores.
    pub score: f32,
    /// Value of the comparer's field, when it named one.
    pub value: Option<FieldValue>,
    /// Discovery order, used to break ties.
    pub seq: usize,
}

/// Total order used by the ordering stage.
pub trait SortComparer: Send + Sync + Debug {
    /// Whether entries need their scores computed.
    fn needs_scores(&self) -> bool {
        false
    }

    /// Field whose first stored value is loaded into [`SortEntry::value`].
    fn field(&self) -> Option<&str> {
        None
    }

    /// Compare two entries. `Less` sorts first.
    fn compare(&self, a: &SortEntry, b: &SortEntry) -> Ordering;

    /// Description used in inspection output.
    fn name(&self) -> String;
}

/// Orders by score, highest first unless built ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreComparer {
    descending: bool,
}

impl ScoreComparer {
    /// Highest score first.
    pub fn new() -> Self {
        ScoreComparer { descending: true }
    }

    /// Lowest score first.
    pub fn ascending() -> Self {
        ScoreComparer { descending: false }
    }
}

impl Default for ScoreComparer {
    fn default() -> Self {
        Self::new()
    }
}

impl SortComparer for ScoreComparer {
    fn needs_scores(&self) -> bool {
        true
    }

    fn compare(&self, a: &SortEntry, b: &SortEntry) -> Ordering {
        if self.descending {
            b.score.total_cmp(&a.score)
        } else {
            a.score.total_cmp(&b.score)
        }
    }

    fn name(&self) -> String {
        if self.descending {
            "Score(Descending)".to_string()
        } else {
            "Score(Ascending)".to_string()
        }
    }
}

/// Orders by a stored field value. Documents without the field sort last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldComparer {
    field: String,
    descending: bool,
}

impl FieldComparer {
    /// Ascending by `field`.
    pub fn new<S: Into<String>>(field: S) -> Self {
        FieldComparer {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending by `field`.
    pub fn descending<S: Into<String>>(field: S) -> Self {
        FieldComparer {
            field: field.into(),
            descending: true,
        }
    }
}

impl SortComparer for FieldComparer {
    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }

    fn compare(&self, a: &SortEntry, b: &SortEntry) -> Ordering {
        match (&a.value, &b.value) {
            (Some(x), Some(y)) if self.descending => y.total_cmp(x),
            (Some(x), Some(y)) => x.total_cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn name(&self) -> String {
        let direction = if self.descending {
            "Descending"
        } else {
            "Ascending"
        };
        format!("Field({}, {direction})", self.field)
    }
}

/// A caller-supplied comparison closure.
pub struct FnComparer<F> {
    name: String,
    field: Option<String>,
    needs_scores: bool,
    compare: F,
}

impl<F> FnComparer<F>
where
    F: Fn(&SortEntry, &SortEntry) -> Ordering + Send + Sync,
{
    /// Wrap `compare` under a descriptive name.
    pub fn new<S: Into<String>>(name: S, compare: F) -> Self {
        FnComparer {
            name: name.into(),
            field: None,
            needs_scores: false,
            compare,
        }
    }

    /// Load `field` into each entry before comparing.
    pub fn with_field<S: Into<String>>(mut self, field: S) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Compute scores before comparing.
    pub fn with_scores(mut self) -> Self {
        self.needs_scores = true;
        self
    }
}

impl<F> Debug for FnComparer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComparer")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("needs_scores", &self.needs_scores)
            .finish()
    }
}

impl<F> SortComparer for FnComparer<F>
where
    F: Fn(&SortEntry, &SortEntry) -> Ordering + Send + Sync,
{
    fn needs_scores(&self) -> bool {
        self.needs_scores
    }

    fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    fn compare(&self, a: &SortEntry, b: &SortEntry) -> Ordering {
        (self.compare)(a, b)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Serves the wrapped match's ids sorted by a [`SortComparer`].
#[derive(Debug)]
pub struct OrderByMatcher<'a> {
    inner: BoxedMatcher<'a>,
    comparer: Arc<dyn SortComparer>,
    reader: &'a dyn IndexReader,
    take: Option<usize>,
    batch_size: usize,
    entries: Option<Vec<SortEntry>>,
    position: usize,
}

impl<'a> OrderByMatcher<'a> {
    /// Order `inner` by `comparer`, keeping only the first `take` entries when given.
    ///
    /// Fails for `take == Some(0)`, for a comparer field the index does not
    /// know, and when `inner` is itself an ordering stage.
    pub fn new(
        inner: BoxedMatcher<'a>,
        comparer: Arc<dyn SortComparer>,
        reader: &'a dyn IndexReader,
        take: Option<usize>,
        config: &MatchConfig,
    ) -> Result<Self> {
        if take == Some(0) {
            return Err(LexmatchError::query("take must be greater than zero"));
        }
        if let Some(field) = comparer.field() {
            if !reader.has_field(field) {
                return Err(LexmatchError::query(format!("unknown sort field '{field}'")));
            }
        }
        if inner.is_ordered() {
            return Err(LexmatchError::query(
                "OrderByMatch cannot wrap another ordering stage",
            ));
        }

        Ok(OrderByMatcher {
            inner,
            comparer,
            reader,
            take,
            batch_size: config.fill_batch_size.max(1),
            entries: None,
            position: 0,
        })
    }

    /// The bound on served entries, if any.
    pub fn take(&self) -> Option<usize> {
        self.take
    }

    fn compare(comparer: &dyn SortComparer, a: &SortEntry, b: &SortEntry) -> Ordering {
        comparer.compare(a, b).then_with(|| a.seq.cmp(&b.seq))
    }

    /// Keep only the `k` best entries, in no particular order.
    fn retain_best(comparer: &dyn SortComparer, entries: &mut Vec<SortEntry>, k: usize) {
        if entries.len() > k {
            entries.select_nth_unstable_by(k - 1, |a, b| Self::compare(comparer, a, b));
            entries.truncate(k);
        }
    }

    fn materialize(&mut self) -> Result<&[SortEntry]> {
        if self.entries.is_none() {
            let entries = self.drain()?;
            self.entries = Some(entries);
        }
        Ok(self.entries.as_deref().unwrap_or_default())
    }

    fn drain(&mut self) -> Result<Vec<SortEntry>> {
        let comparer = self.comparer.as_ref();
        let needs_scores = comparer.needs_scores();
        let field = comparer.field();

        let mut buffer = vec![0; self.batch_size];
        let mut scores = vec![0.0; if needs_scores { self.batch_size } else { 0 }];
        let mut entries = Vec::new();
        let mut drained = 0usize;

        loop {
            let read = self.inner.fill(&mut buffer)?;
            if read == 0 {
                break;
            }
            if needs_scores {
                self.inner.score(&buffer[..read], &mut scores[..read])?;
            }

            for (index, &doc_id) in buffer[..read].iter().enumerate() {
                let value = match field {
                    Some(field) => self.reader.read_field(doc_id, field)?,
                    None => None,
                };
                entries.push(SortEntry {
                    doc_id,
                    score: if needs_scores { scores[index] } else { 0.0 },
                    value,
                    seq: drained,
                });
                drained += 1;

                if let Some(k) = self.take {
                    if entries.len() >= k.saturating_mul(2) {
                        Self::retain_best(comparer, &mut entries, k);
                    }
                }
            }
        }

        if let Some(k) = self.take {
            Self::retain_best(comparer, &mut entries, k);
        }
        entries.sort_by(|a, b| Self::compare(comparer, a, b));

        log::debug!(
            "ordered {} matches by {}, serving {} ({})",
            drained,
            comparer.name(),
            entries.len(),
            match self.take {
                Some(k) if k < drained => "top-k",
                _ => "full",
            }
        );

        Ok(entries)
    }
}

impl Matcher for OrderByMatcher<'_> {
    fn fill(&mut self, buffer: &mut [DocId]) -> Result<usize> {
        let position = self.position;
        let entries = self.materialize()?;
        let remaining = entries.get(position..).unwrap_or_default();
        let count = remaining.len().min(buffer.len());

        for (slot, entry) in buffer.iter_mut().zip(&remaining[..count]) {
            *slot = entry.doc_id;
        }
        self.position += count;
        Ok(count)
    }

    fn evaluate(&mut self, doc_id: DocId) -> Result<bool> {
        if self.take.is_none() {
            return self.inner.evaluate(doc_id);
        }
        Ok(self
            .materialize()?
            .iter()
            .any(|entry| entry.doc_id == doc_id))
    }

    fn score(&mut self, doc_ids: &[DocId], scores: &mut [f32]) -> Result<()> {
        self.inner.score(doc_ids, scores)
    }

    fn is_scored(&self) -> bool {
        self.inner.is_scored()
    }

    fn is_ordered(&self) -> bool {
        true
    }

    /// Rewind the served position; the sorted entries are kept.
    fn reset(&mut self) {
        self.position = 0;
    }

    fn cost(&self) -> u64 {
        match self.take {
            Some(k) => self.inner.cost().min(k as u64),
            None => self.inner.cost(),
        }
    }

    fn inspect(&self) -> QueryInspectionNode {
        let mut node =
            QueryInspectionNode::new("OrderByMatch").with_parameter("Comparer", self.comparer.name());
        if let Some(take) = self.take {
            node = node.with_parameter("Take", take);
        }
        node.with_child(self.inner.inspect())
    }
}
