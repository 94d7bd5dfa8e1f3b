//! Keyed destinations for page records.

pub mod debug;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::PageRecord;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A table keyed by `page_path` that accepts bulk puts.
///
/// `put_batch` receives at most one batch threshold's worth of rows and is one
/// round trip. Implementations report capacity rejections as
/// [`StoreError::Throttled`] and everything else as [`StoreError::Backend`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Table identifier, for logs and errors.
    fn name(&self) -> &str;

    /// Upsert every row in one request.
    async fn put_batch(&self, rows: &[PageRecord]) -> StoreResult<()>;

    /// Delete every row. Returns how many rows were removed.
    async fn clear(&self) -> StoreResult<u64>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn put_batch(&self, rows: &[PageRecord]) -> StoreResult<()> {
        (**self).put_batch(rows).await
    }

    async fn clear(&self) -> StoreResult<u64> {
        (**self).clear().await
    }
}
