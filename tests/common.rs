#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pagesync::document::RawDocument;
use pagesync::error::{Result, StoreError};
use pagesync::record::PageRecord;
use pagesync::source::DocumentSource;
use pagesync::store::{RecordStore, StoreResult};
use serde_json::Value;
use tokio::time::Instant;

/// Shared, ordered log of source reads and store puts.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn doc(key: &str, body: Value) -> RawDocument {
    RawDocument::new(key, body.to_string())
}

/// `count` leaf pages under `/sec`, keyed `/sec/pNN/index.json`.
pub fn pages(count: usize) -> Vec<RawDocument> {
    (0..count)
        .map(|i| {
            doc(
                &format!("/sec/p{i:02}/index.json"),
                serde_json::json!({ "metadata": { "title": format!("Page {i}") } }),
            )
        })
        .collect()
}

pub struct VecSource {
    docs: VecDeque<RawDocument>,
    log: Option<EventLog>,
}

impl VecSource {
    pub fn new(docs: Vec<RawDocument>) -> Self {
        Self {
            docs: docs.into(),
            log: None,
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }
}

#[async_trait]
impl DocumentSource for VecSource {
    fn describe(&self) -> String {
        "vec".to_string()
    }

    async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        let next = self.docs.pop_front();
        if let (Some(log), Some(doc)) = (&self.log, &next) {
            log.lock().unwrap().push(format!("read {}", doc.key));
        }
        Ok(next)
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Throttle,
    Fail(&'static str),
}

/// Store that answers `put_batch` from a script, then succeeds once the
/// script runs out.
pub struct ScriptedStore {
    replies: Mutex<VecDeque<Reply>>,
    attempts: Mutex<Vec<Instant>>,
    rows: Mutex<Vec<PageRecord>>,
    log: Option<EventLog>,
}

impl ScriptedStore {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            attempts: Mutex::new(Vec::new()),
            rows: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Time between consecutive attempts, i.e. the backoff waits.
    pub fn waits(&self) -> Vec<std::time::Duration> {
        let attempts = self.attempts.lock().unwrap();
        attempts.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn rows(&self) -> Vec<PageRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn put_batch(&self, rows: &[PageRecord]) -> StoreResult<()> {
        self.attempts.lock().unwrap().push(Instant::now());
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Ok);
        match reply {
            Reply::Ok => {
                self.rows.lock().unwrap().extend_from_slice(rows);
                if let Some(log) = &self.log {
                    log.lock().unwrap().push(format!("put {}", rows.len()));
                }
                Ok(())
            }
            Reply::Throttle => Err(StoreError::throttled("ProvisionedThroughputExceeded")),
            Reply::Fail(msg) => Err(StoreError::backend(msg)),
        }
    }

    async fn clear(&self) -> StoreResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let removed = rows.len() as u64;
        rows.clear();
        Ok(removed)
    }
}

pub fn page_row(path: &str) -> PageRecord {
    PageRecord {
        page_path: path.to_string(),
        page_section: "/".to_string(),
        page_date: String::new(),
        page_search_content: String::new(),
        object_key: format!("{}/index.json", path.trim_start_matches('/')),
        metadata: "null".to_string(),
    }
}
