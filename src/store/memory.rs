use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::PageRecord;
use crate::store::{RecordStore, StoreResult};

/// In-process table. Clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStore {
    name: String,
    rows: Arc<Mutex<BTreeMap<String, PageRecord>>>,
    puts: Arc<Mutex<Vec<usize>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, page_path: &str) -> Option<PageRecord> {
        lock(&self.rows).ok()?.get(page_path).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row, ordered by key.
    pub fn rows(&self) -> Vec<PageRecord> {
        lock(&self.rows)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Size of each `put_batch` call received, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        lock(&self.puts).map(|p| p.clone()).unwrap_or_default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::backend("memory store mutex poisoned"))
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put_batch(&self, rows: &[PageRecord]) -> StoreResult<()> {
        let mut table = lock(&self.rows)?;
        for row in rows {
            table.insert(row.page_path.clone(), row.clone());
        }
        lock(&self.puts)?.push(rows.len());
        Ok(())
    }

    async fn clear(&self) -> StoreResult<u64> {
        let mut table = lock(&self.rows)?;
        let removed = table.len() as u64;
        table.clear();
        Ok(removed)
    }
}
