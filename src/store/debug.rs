use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::PageRecord;
use crate::store::{RecordStore, StoreResult};

/// Prints each row as a JSON line instead of persisting it. Used for dry runs.
pub struct DebugStore {
    name: String,
}

impl DebugStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One dry-run output line: `<table> <row as JSON>`.
pub fn render_row(table: &str, row: &PageRecord) -> Result<String, StoreError> {
    let json = serde_json::to_string(row).map_err(StoreError::backend)?;
    Ok(format!("{table} {json}"))
}

#[async_trait]
impl RecordStore for DebugStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put_batch(&self, rows: &[PageRecord]) -> StoreResult<()> {
        for row in rows {
            println!("{}", render_row(&self.name, row)?);
        }
        Ok(())
    }

    async fn clear(&self) -> StoreResult<u64> {
        println!("clear: {}", self.name);
        Ok(0)
    }
}

impl Default for DebugStore {
    fn default() -> Self {
        Self::new("debug")
    }
}
