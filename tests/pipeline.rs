use std::sync::{Arc, Mutex};

use pagesync::document::RawDocument;
use pagesync::error::{Error, Result};
use pagesync::pipeline::runtime::{ClearPolicy, Runtime};
use pagesync::pipeline::writer::BatchWriter;
use pagesync::record::search::build_search_content;
use pagesync::store::memory::MemoryStore;
use pagesync::store::RecordStore;
use serde_json::json;

mod common;
use common::{doc, page_row, pages, EventLog, Reply, ScriptedStore, VecSource};

#[tokio::test]
async fn section_and_page_end_to_end() -> Result<()> {
    let page_body = json!({
        "date": "2023-11-05",
        "summary": "A Page",
        "plain": "Body Text",
        "metadata": { "title": "Page", "tags": ["Tag"], "categories": ["Cat"] }
    });
    let mut source = VecSource::new(vec![
        doc("/sec/index.json", json!({ "children": [{ "link": "/sec/page" }] })),
        doc("/sec/page/index.json", page_body.clone()),
    ]);
    let store = MemoryStore::new("search");
    let runtime = Runtime::new(BatchWriter::new(store.clone()));

    let report = runtime.run(&mut source).await?;

    assert_eq!(report.pages, 1);
    assert_eq!(report.sections, 1);
    assert_eq!(report.page_batches, 1);
    assert_eq!(report.section_batches, 1);

    let rows = store.rows();
    assert_eq!(rows.len(), 1, "sections are not persisted");
    let page = &rows[0];
    assert_eq!(page.page_path, "/sec/page");
    assert_eq!(page.page_section, "/sec");
    assert_eq!(page.page_date, "2023-11-05");
    assert_eq!(page.object_key, "/sec/page/index.json");

    let parsed = serde_json::from_value(page_body).unwrap();
    assert_eq!(page.page_search_content, build_search_content(&parsed));
    assert_eq!(page.page_search_content, "cat tag page a page body text");
    Ok(())
}

#[tokio::test]
async fn forty_five_pages_flush_as_20_20_5() -> Result<()> {
    let mut source = VecSource::new(pages(45));
    let store = MemoryStore::new("search");

    let report = Runtime::new(BatchWriter::new(store.clone()))
        .run(&mut source)
        .await?;

    assert_eq!(report.pages, 45);
    assert_eq!(report.page_batches, 3);
    assert_eq!(store.batch_sizes(), [20, 20, 5]);
    assert_eq!(store.len(), 45);
    assert_eq!(store.get("/sec/p07").unwrap().page_section, "/sec");
    Ok(())
}

#[tokio::test]
async fn no_document_is_read_while_a_flush_is_pending() -> Result<()> {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let mut source = VecSource::new(pages(21)).with_log(log.clone());
    let store = ScriptedStore::succeeding().with_log(log.clone());

    Runtime::new(BatchWriter::new(store)).run(&mut source).await?;

    let events = log.lock().unwrap().clone();
    assert_eq!(events.len(), 23);
    assert!(events[..20].iter().all(|e| e.starts_with("read ")));
    assert_eq!(events[20], "put 20");
    assert_eq!(events[21], "read /sec/p20/index.json");
    assert_eq!(events[22], "put 1");
    Ok(())
}

#[tokio::test]
async fn non_marker_keys_are_skipped() -> Result<()> {
    let mut source = VecSource::new(vec![
        doc("/a/index.json", json!({})),
        doc("/a/readme.md", json!("not a descriptor")),
    ]);
    let store = MemoryStore::new("search");

    let report = Runtime::new(BatchWriter::new(store.clone()))
        .run(&mut source)
        .await?;

    assert_eq!(report.pages, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.len(), 1);
    Ok(())
}

#[tokio::test]
async fn parse_error_aborts_but_keeps_flushed_batches() {
    let mut docs = pages(20);
    docs.push(RawDocument::new("/sec/bad/index.json", "{ broken"));
    docs.extend(pages(3));
    let mut source = VecSource::new(docs);
    let store = MemoryStore::new("search");

    let err = Runtime::new(BatchWriter::new(store.clone()))
        .run(&mut source)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse { ref key, .. } if key == "/sec/bad/index.json"));
    assert_eq!(store.len(), 20);
}

#[tokio::test(start_paused = true)]
async fn fatal_store_error_ends_the_run() {
    let mut source = VecSource::new(pages(25));
    let store = Arc::new(ScriptedStore::new(vec![Reply::Throttle, Reply::Ok, Reply::Fail("gone")]));

    let err = Runtime::new(BatchWriter::new(store.clone()))
        .run(&mut source)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    assert_eq!(store.attempts(), 3);
    assert_eq!(store.rows().len(), 20);
}

#[tokio::test]
async fn sections_only_run_writes_nothing() -> Result<()> {
    let docs = (0..25)
        .map(|i| doc(&format!("/s{i}/index.json"), json!({ "children": ["x"] })))
        .collect();
    let mut source = VecSource::new(docs);
    let store = MemoryStore::new("search");

    let report = Runtime::new(BatchWriter::new(store.clone()))
        .run(&mut source)
        .await?;

    assert_eq!(report.sections, 25);
    assert_eq!(report.section_batches, 2);
    assert_eq!(report.page_batches, 0);
    assert!(store.is_empty());
    assert!(store.batch_sizes().is_empty());
    Ok(())
}

#[tokio::test]
async fn retain_policy_keeps_orphaned_rows() -> Result<()> {
    let store = MemoryStore::new("search");
    store.put_batch(&[page_row("/removed")]).await?;

    let mut source = VecSource::new(pages(1));
    let report = Runtime::new(BatchWriter::new(store.clone()))
        .run(&mut source)
        .await?;

    assert_eq!(report.cleared, 0);
    assert!(store.get("/removed").is_some());
    assert_eq!(store.len(), 2);
    Ok(())
}

#[tokio::test]
async fn scan_and_delete_clears_prior_rows() -> Result<()> {
    let store = MemoryStore::new("search");
    store
        .put_batch(&[page_row("/removed"), page_row("/also-removed")])
        .await?;

    let mut source = VecSource::new(pages(1));
    let report = Runtime::new(BatchWriter::new(store.clone()))
        .clear_policy(ClearPolicy::ScanAndDelete)
        .run(&mut source)
        .await?;

    assert_eq!(report.cleared, 2);
    assert!(store.get("/removed").is_none());
    assert_eq!(store.len(), 1);
    Ok(())
}

#[tokio::test]
async fn rerun_overwrites_rows_by_path() -> Result<()> {
    let store = MemoryStore::new("search");
    let runtime = Runtime::new(BatchWriter::new(store.clone()));

    runtime.run(&mut VecSource::new(pages(3))).await?;
    runtime.run(&mut VecSource::new(pages(3))).await?;

    assert_eq!(store.len(), 3);
    assert_eq!(store.batch_sizes(), [3, 3]);
    Ok(())
}
