//! Independent match trees over one shared index, evaluated from many threads.

use std::sync::Arc;
use std::thread;

use lexmatch::prelude::*;

fn shared_index() -> Result<MemoryIndex> {
    let mut writer = MemoryIndexWriter::new(IndexConfig::default().with_posting_block_size(8))?;
    for n in 0..500i64 {
        writer.add_document(
            Document::builder(format!("item/{n}"))
                .add_integer("bucket", n % 7)
                .add_integer("rank", (n * 37) % 101)
                .build(),
        )?;
    }
    writer.commit()
}

fn bucket_query(bucket: i64) -> QueryNode {
    QueryNode::or(vec![
        QueryNode::term("bucket", bucket.to_string()).boost(2.0),
        QueryNode::starts_with("id", "item/1"),
    ])
    .order_by_field("rank", true, Some(20))
}

#[test]
fn test_scoped_threads_share_reader() -> Result<()> {
    let index = shared_index()?;
    let searcher = IndexSearcher::new(&index);

    let serial = (0..7)
        .map(|bucket| searcher.execute(&bucket_query(bucket), None))
        .collect::<Result<Vec<_>>>()?;

    let parallel = thread::scope(|scope| {
        let handles: Vec<_> = (0..7)
            .map(|bucket| {
                let index = &index;
                scope.spawn(move || {
                    IndexSearcher::new(index).execute(&bucket_query(bucket), None)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("search thread panicked"))
            .collect::<Result<Vec<_>>>()
    })?;

    assert_eq!(parallel.len(), serial.len());
    for (a, b) in parallel.iter().zip(&serial) {
        assert_eq!(a.hits.len(), 20);
        assert_eq!(a.total_hits, b.total_hits);
        assert_eq!(a.external_ids(), b.external_ids());
        assert_eq!(a.scores(), b.scores());
    }

    Ok(())
}

#[test]
fn test_arc_shared_index_across_spawned_threads() -> Result<()> {
    let index = Arc::new(shared_index()?);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let index = Arc::clone(&index);
            thread::spawn(move || -> Result<Vec<DocId>> {
                let searcher = IndexSearcher::new(index.as_ref());
                let mut matcher = searcher.search(&QueryNode::and(vec![
                    QueryNode::term("bucket", "3"),
                    QueryNode::All,
                ]))?;
                fill_all(matcher.as_mut(), 1 + worker * 5)
            })
        })
        .collect();

    let mut outputs = Vec::new();
    for handle in handles {
        outputs.push(handle.join().expect("search thread panicked")?);
    }

    let expected: Vec<DocId> = (0..500).filter(|n| n % 7 == 3).collect();
    for ids in outputs {
        assert_eq!(ids, expected);
    }

    Ok(())
}
