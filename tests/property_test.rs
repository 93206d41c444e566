//! Randomized checks of the set algebra and ordering laws over seeded indexes.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lexmatch::prelude::*;

const TAGS: [&str; 4] = ["red", "green", "blue", "black"];

struct Fixture {
    index: MemoryIndex,
    postings: Vec<BTreeSet<DocId>>,
}

fn random_fixture(seed: u64, doc_count: u64) -> Result<Fixture> {
    let mut rng = StdRng::seed_from_u64(seed);
    let block_size = rng.random_range(1..16);
    let mut writer =
        MemoryIndexWriter::new(IndexConfig::default().with_posting_block_size(block_size))?;
    let mut postings = vec![BTreeSet::new(); TAGS.len()];

    for n in 0..doc_count {
        let mut builder =
            Document::builder(format!("doc/{n}")).add_integer("rank", rng.random_range(0..20));
        for (slot, tag) in TAGS.iter().enumerate() {
            if rng.random_bool(0.3) {
                builder = builder.add_text("tag", *tag);
                postings[slot].insert(n);
            }
        }
        writer.add_document(builder.build())?;
    }

    Ok(Fixture {
        index: writer.commit()?,
        postings,
    })
}

#[test]
fn test_and_is_intersection() -> Result<()> {
    for seed in 0..20 {
        let fixture = random_fixture(seed, 300)?;
        let searcher = IndexSearcher::new(&fixture.index);
        let mut rng = StdRng::seed_from_u64(seed + 1000);

        let mut matcher = searcher.and(vec![
            searcher.term_query("tag", TAGS[0])?,
            searcher.term_query("tag", TAGS[1])?,
            searcher.term_query("tag", TAGS[2])?,
        ])?;
        let ids = fill_all(matcher.as_mut(), rng.random_range(1..64))?;

        let expected: Vec<DocId> = fixture.postings[0]
            .iter()
            .filter(|id| fixture.postings[1].contains(id) && fixture.postings[2].contains(id))
            .copied()
            .collect();
        assert_eq!(ids, expected, "seed {seed}");
    }

    Ok(())
}

#[test]
fn test_or_is_union() -> Result<()> {
    for seed in 0..20 {
        let fixture = random_fixture(seed, 300)?;
        let searcher = IndexSearcher::new(&fixture.index);
        let mut rng = StdRng::seed_from_u64(seed + 2000);

        let children = TAGS
            .iter()
            .map(|tag| searcher.term_query("tag", tag))
            .collect::<Result<Vec<_>>>()?;
        let mut matcher = searcher.or(children)?;
        let ids = fill_all(matcher.as_mut(), rng.random_range(1..64))?;

        let expected: Vec<DocId> = fixture
            .postings
            .iter()
            .flatten()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        assert_eq!(ids, expected, "seed {seed}");
    }

    Ok(())
}

#[test]
fn test_and_not_is_difference() -> Result<()> {
    for seed in 0..10 {
        let fixture = random_fixture(seed, 200)?;
        let searcher = IndexSearcher::new(&fixture.index);

        let mut matcher = searcher.and_not(
            searcher.term_query("tag", TAGS[3])?,
            searcher.term_query("tag", TAGS[0])?,
        )?;
        let ids = fill_all(matcher.as_mut(), 7)?;

        let expected: Vec<DocId> = fixture.postings[3]
            .difference(&fixture.postings[0])
            .copied()
            .collect();
        assert_eq!(ids, expected, "seed {seed}");
    }

    Ok(())
}

#[test]
fn test_top_k_is_prefix_of_full_sort() -> Result<()> {
    for seed in 0..10 {
        let fixture = random_fixture(seed, 400)?;
        let searcher = IndexSearcher::new(&fixture.index);
        let mut rng = StdRng::seed_from_u64(seed + 3000);

        let base = QueryNode::or(vec![
            QueryNode::term("tag", TAGS[0]).boost(3.0),
            QueryNode::term("tag", TAGS[1]).boost(2.0),
            QueryNode::term("tag", TAGS[2]),
        ]);

        let full = searcher.execute(&base.clone().order_by_score(None), None)?;
        let take = rng.random_range(1..50);
        let top = searcher.execute(&base.order_by_score(Some(take)), None)?;

        let expected: Vec<DocId> = full
            .hits
            .iter()
            .take(take as usize)
            .map(|hit| hit.doc_id)
            .collect();
        let actual: Vec<DocId> = top.hits.iter().map(|hit| hit.doc_id).collect();
        assert_eq!(actual, expected, "seed {seed}, take {take}");

        for pair in full.hits.windows(2) {
            assert!(pair[0].score >= pair[1].score, "seed {seed}");
            if pair[0].score == pair[1].score {
                assert!(pair[0].doc_id < pair[1].doc_id, "seed {seed}");
            }
        }
    }

    Ok(())
}

#[test]
fn test_field_sort_matches_stored_values() -> Result<()> {
    let fixture = random_fixture(7, 250)?;
    let searcher = IndexSearcher::new(&fixture.index);

    let query = QueryNode::term("tag", TAGS[1]).order_by_field("rank", false, Some(25));
    let results = searcher.execute(&query, None)?;

    let mut expected: Vec<(i64, DocId)> = fixture.postings[1]
        .iter()
        .map(|&id| -> Result<(i64, DocId)> {
            let rank = fixture
                .index
                .read_field(id, "rank")?
                .and_then(|value| value.as_integer())
                .unwrap_or_default();
            Ok((rank, id))
        })
        .collect::<Result<_>>()?;
    expected.sort();
    expected.truncate(25);

    let actual: Vec<DocId> = results.hits.iter().map(|hit| hit.doc_id).collect();
    let expected: Vec<DocId> = expected.into_iter().map(|(_, id)| id).collect();
    assert_eq!(actual, expected);

    Ok(())
}
