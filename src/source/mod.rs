//! Where documents come from.

pub mod fs;

use async_trait::async_trait;

use crate::document::RawDocument;
use crate::error::Result;

/// A lazy, one-shot sequence of documents.
///
/// Every marker document under the source's root must be yielded exactly once
/// per run. Order is up to the implementation.
#[async_trait]
pub trait DocumentSource: Send {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// The next document, or `None` once the source is exhausted.
    async fn next_document(&mut self) -> Result<Option<RawDocument>>;
}

#[async_trait]
impl<S> DocumentSource for Box<S>
where
    S: DocumentSource + ?Sized,
{
    fn describe(&self) -> String {
        (**self).describe()
    }

    async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        (**self).next_document().await
    }
}
