//! Integration tests for boosting, score functions and score ordering.

use std::sync::Arc;

use lexmatch::prelude::*;
use lexmatch::query::{BoxedMatcher, ScoreFunctionSpec, TermFrequencyScore};

fn build_index(entries: &[(&str, i64)]) -> Result<MemoryIndex> {
    let mut writer = MemoryIndexWriter::new(IndexConfig::default().with_posting_block_size(4))?;
    for &(id, content) in entries {
        writer.add_document(
            Document::builder(id)
                .add_integer("Content1", content)
                .add_integer("Content2", content)
                .build(),
        )?;
    }
    writer.commit()
}

const OR_ENTRIES: [(&str, i64); 6] = [
    ("list/1", 1),
    ("list/11", 0),
    ("list/111", 0),
    ("list/2", 1),
    ("list/4", 1),
    ("list/3", 2),
];

fn fill_once<M: Matcher + ?Sized>(matcher: &mut M) -> Result<Vec<DocId>> {
    let mut ids = vec![0; 2048];
    let read = matcher.fill(&mut ids)?;
    ids.truncate(read);
    Ok(ids)
}

fn external_ids(index: &MemoryIndex, ids: &[DocId]) -> Result<Vec<String>> {
    ids.iter()
        .map(|&id| Ok(index.external_id(id)?.unwrap_or_default().to_string()))
        .collect()
}

#[test]
fn test_simple_boosting() -> Result<()> {
    let ids: Vec<String> = (0..1000).map(|i| format!("list/{i}")).collect();
    let entries: Vec<(&str, i64)> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i as i64))
        .collect();
    let index = build_index(&entries)?;
    let searcher = IndexSearcher::new(&index);

    let mut boosted = searcher.boost(searcher.all_entries(), 10.0)?;
    let ids = fill_once(boosted.as_mut())?;
    assert_eq!(ids.len(), 1000);

    let mut scores = vec![1.0; ids.len()];
    boosted.score(&ids, &mut scores)?;
    assert!(scores.iter().all(|&score| score == 10.0));

    Ok(())
}

#[test]
fn test_or_boosting() -> Result<()> {
    let index = build_index(&OR_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);

    let starts_with = searcher.starts_with("id", "list/1")?;
    let boosted_starts_with = searcher.boost(starts_with, 2.0)?;
    let content = searcher.term_query("Content1", "1")?;
    let or = searcher.or(vec![boosted_starts_with, content])?;
    let mut boosted_or = searcher.boost(or, 10.0)?;

    let ids = fill_once(boosted_or.as_mut())?;
    assert_eq!(
        external_ids(&index, &ids)?,
        vec!["list/1", "list/11", "list/111", "list/2", "list/4"]
    );

    let mut scores = vec![1.0; ids.len()];
    boosted_or.score(&ids, &mut scores)?;
    assert_eq!(scores, vec![20.0, 20.0, 20.0, 10.0, 10.0]);

    Ok(())
}

fn ordered_or<'a>(searcher: &IndexSearcher<'a>, take: Option<usize>) -> Result<BoxedMatcher<'a>> {
    let starts_with = searcher.starts_with("id", "list/1")?;
    let boosted_starts_with = searcher.boost(starts_with, 2.0)?;
    let content = searcher.term_query("Content1", "1")?;
    let or = searcher.or(vec![boosted_starts_with, content])?;
    let boosted_or = searcher.boost(or, 10.0)?;
    let content2 = searcher.term_query("Content1", "2")?;
    let or2 = searcher.or(vec![content2, boosted_or])?;
    searcher.order_by_score(or2, take)
}

#[test]
fn test_order_by_boosting() -> Result<()> {
    let index = build_index(&OR_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);

    let mut sorted = ordered_or(&searcher, None)?;
    let ids = fill_once(sorted.as_mut())?;

    let expected: Vec<&str> = OR_ENTRIES.iter().map(|(id, _)| *id).collect();
    assert_eq!(external_ids(&index, &ids)?, expected);

    Ok(())
}

#[test]
fn test_order_by_boosting_take_4() -> Result<()> {
    let index = build_index(&OR_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);

    let mut sorted = ordered_or(&searcher, Some(4))?;
    let ids = fill_once(sorted.as_mut())?;

    assert_eq!(
        external_ids(&index, &ids)?,
        vec!["list/1", "list/11", "list/111", "list/2"]
    );

    Ok(())
}

const TF_ENTRIES: [(&str, i64); 6] = [
    ("list/1", 0),
    ("list/2", 0),
    ("list/3", 1),
    ("list/4", 1),
    ("list/5", 1),
    ("list/6", 1),
];

#[test]
fn test_order_by_boosting_term_frequency() -> Result<()> {
    let index = build_index(&TF_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);
    let tf: Arc<dyn ScoreFunction> = Arc::new(TermFrequencyScore::new());

    let content0 = searcher.boost_with(searcher.term_query("Content1", "0")?, tf.clone())?;
    let content1 = searcher.boost_with(searcher.term_query("Content1", "1")?, tf)?;
    let or = searcher.or(vec![content0, content1])?;
    let boosted = searcher.boost(or, 10.0)?;
    let mut sorted = searcher.order_by_score(boosted, None)?;

    let results = searcher.collect(sorted.as_mut(), None)?;
    assert_eq!(
        results.external_ids(),
        vec!["list/1", "list/2", "list/3", "list/4", "list/5", "list/6"]
    );
    assert_eq!(results.scores(), vec![5.0, 5.0, 2.5, 2.5, 2.5, 2.5]);
    assert_eq!(results.max_score, 5.0);

    Ok(())
}

#[test]
fn test_in_query_with_term_frequency() -> Result<()> {
    let index = build_index(&TF_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);

    let mut query = searcher.in_query(
        "Content1",
        ["0", "1"],
        Some(Arc::new(TermFrequencyScore::new())),
    )?;
    let ids = fill_once(query.as_mut())?;
    assert_eq!(
        external_ids(&index, &ids)?,
        vec!["list/1", "list/2", "list/3", "list/4", "list/5", "list/6"]
    );

    let mut scores = vec![0.0; ids.len()];
    query.score(&ids, &mut scores)?;
    assert_eq!(scores, vec![0.5, 0.5, 0.25, 0.25, 0.25, 0.25]);

    Ok(())
}

#[test]
fn test_order_by_multi_term_frequency() -> Result<()> {
    let entries = [
        ("list/1", 0),
        ("list/3", 2),
        ("list/4", 3),
        ("list/2", 1),
        ("list/22", 1),
        ("list/33", 2),
        ("list/44", 3),
        ("list/333", 2),
        ("list/444", 3),
        ("list/4444", 3),
    ];
    let index = build_index(&entries)?;
    let searcher = IndexSearcher::new(&index);

    let query = QueryNode::in_list("Content1", ["0", "1", "2", "3"])
        .scored_by(ScoreFunctionSpec::TermFrequency)
        .order_by_score(None);
    let mut sorted = searcher.search(&query)?;
    let ids = fill_once(sorted.as_mut())?;

    let mut values = Vec::new();
    for id in ids {
        values.push(index.read_field(id, "Content1")?.and_then(|v| v.as_integer()));
    }

    let mut expected: Vec<i64> = entries.iter().map(|(_, content)| *content).collect();
    expected.sort();
    assert_eq!(
        values,
        expected.into_iter().map(Some).collect::<Vec<_>>()
    );

    Ok(())
}

#[test]
fn test_boost_composes_through_and() -> Result<()> {
    let index = build_index(&OR_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);

    // Additive: 3 (boosted prefix) + 4 (boosted term) for list/1.
    let query = QueryNode::and(vec![
        QueryNode::starts_with("id", "list/1").boost(3.0),
        QueryNode::term("Content1", "1").boost(4.0),
    ]);
    let results = searcher.execute(&query, None)?;

    assert_eq!(results.external_ids(), vec!["list/1"]);
    assert_eq!(results.scores(), vec![7.0]);

    Ok(())
}

#[test]
fn test_zero_boost_orders_last() -> Result<()> {
    let index = build_index(&OR_ENTRIES)?;
    let searcher = IndexSearcher::new(&index);

    let query = QueryNode::or(vec![
        QueryNode::term("Content1", "0").boost(0.0),
        QueryNode::term("Content1", "1").boost(1.0),
    ])
    .order_by_score(None);
    let results = searcher.execute(&query, None)?;

    assert_eq!(
        results.external_ids(),
        vec!["list/1", "list/2", "list/4", "list/11", "list/111"]
    );
    assert_eq!(results.scores(), vec![1.0, 1.0, 1.0, 0.0, 0.0]);

    Ok(())
}
