//! # pagesync
//!
//! **Sync a tree of page descriptors into a keyed search table.**
//!
//! `pagesync` reads every `index.json` descriptor under a content root,
//! decides whether it describes a *section* (it has children) or a *page*
//! (a leaf), and writes one search row per page into a store, twenty rows
//! at a time.
//!
//! The store is allowed to push back. A throttled batch is retried with
//! exponential backoff; anything else stops the run.
//!
//! ---
//!
//! ## Core Model
//!
//! ```text
//! DocumentSource → parse → classify → Accumulator → BatchWriter → RecordStore
//! ```
//!
//! - [`DocumentSource`] yields `(key, body)` pairs, e.g. [`FsSource`] walking a
//!   directory.
//! - [`classify`] turns a parsed descriptor into a [`ClassifiedRecord`]; pages
//!   get a canonical path, the section above them and a lowercase search blob.
//! - [`Accumulator`] keeps pages and sections in separate buffers of 20.
//! - [`BatchWriter`] sends one bulk put per full buffer and applies the
//!   [`RetryPolicy`].
//! - [`Runtime`] drives all of it, one document at a time.
//!
//! ---
//!
//! ## Example
//!
//! ```no_run
//! use pagesync::prelude::*;
//! use pagesync::store::memory::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> pagesync::error::Result<()> {
//!     let store = MemoryStore::new("resource_search");
//!     let writer = BatchWriter::new(store.clone()).with_retry(RetryPolicy::throughput());
//!
//!     let mut source = FsSource::new("content/");
//!     let report = Runtime::new(writer).run(&mut source).await?;
//!
//!     println!("{} pages, {} sections", report.pages, report.sections);
//!     Ok(())
//! }
//! ```
//!
//! ---
//!
//! ## Paths
//!
//! | key                          | kind    | path          | section  |
//! |------------------------------|---------|---------------|----------|
//! | `index.json`                 | page    | `/`           | `/`      |
//! | `guides/index.json` (+kids)  | section | `/guides`     |          |
//! | `guides/setup/index.json`    | page    | `/guides/setup` | `/guides` |
//!
//! See [`record::path::canonicalize`].
//!
//! ---
//!
//! ## Retry Contract
//!
//! - Only [`StoreError::Throttled`] is retried (configurable via
//!   [`RetryPolicy::retry_if`]).
//! - [`RetryPolicy::throughput`]: 20 attempts, waits of 1.5s, 3s, 6s, ...
//! - Exhaustion fails with [`Error::RetryExhausted`]; any other store error
//!   is returned unchanged as [`Error::Store`].
//! - Batches written before a failure stay written. Delivery is
//!   at-least-once.
//!
//! ---
//!
//! ## Observability
//!
//! With the default `tracing` feature, `pagesync` emits structured events such
//! as `pagesync.enumerate.start`, `pagesync.batch.write`,
//! `pagesync.retry.sleep`, `pagesync.retry.exhausted` and
//! `pagesync.enumerate.done`.
//!
//! ---
//!
//! ## Feature Flags
//!
//! - `tracing` *(default)*: structured logging.
//! - `sqlite` *(default)*: [`store::sqlite::SqliteStore`].
//! - `cli` *(default)*: the `pagesync` binary.
//!
//! [`DocumentSource`]: source::DocumentSource
//! [`FsSource`]: source::fs::FsSource
//! [`classify`]: record::classify
//! [`ClassifiedRecord`]: record::ClassifiedRecord
//! [`Accumulator`]: pipeline::batch::Accumulator
//! [`BatchWriter`]: pipeline::writer::BatchWriter
//! [`RetryPolicy`]: pipeline::retry::RetryPolicy
//! [`RetryPolicy::retry_if`]: pipeline::retry::RetryPolicy::retry_if
//! [`RetryPolicy::throughput`]: pipeline::retry::RetryPolicy::throughput
//! [`Runtime`]: pipeline::runtime::Runtime
//! [`StoreError::Throttled`]: error::StoreError::Throttled
//! [`Error::RetryExhausted`]: error::Error::RetryExhausted
//! [`Error::Store`]: error::Error::Store

pub mod document;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod store;

pub mod prelude {
    //! Convenient imports for most `pagesync` users.

    pub use crate::document::{ParsedDocument, RawDocument};
    pub use crate::pipeline::retry::RetryPolicy;
    pub use crate::pipeline::runtime::{ClearPolicy, RunReport, Runtime};
    pub use crate::pipeline::writer::BatchWriter;
    pub use crate::record::{classify, ClassifiedRecord};
    pub use crate::source::fs::FsSource;
    pub use crate::source::DocumentSource;
    pub use crate::store::RecordStore;
}
