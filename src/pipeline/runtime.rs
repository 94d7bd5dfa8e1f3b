use std::time::Duration;

use tokio::time::Instant;

use crate::document::is_marker_key;
use crate::error::{Error, Result};
use crate::pipeline::batch::{Accumulator, BATCH_THRESHOLD};
use crate::pipeline::writer::BatchWriter;
use crate::record::{classify, PageRecord, RecordKind, SectionRecord};
use crate::source::DocumentSource;
use crate::store::RecordStore;

/// What to do with rows left over from earlier runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Keep existing rows. Documents removed from the source leave orphaned rows.
    #[default]
    Retain,
    /// Delete every row in the table before enumerating the source.
    ScanAndDelete,
}

/// Counts from one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub pages: usize,
    pub sections: usize,
    pub page_batches: usize,
    pub section_batches: usize,
    /// Non-marker keys yielded by the source and ignored.
    pub skipped: usize,
    /// Rows removed by [`ClearPolicy::ScanAndDelete`].
    pub cleared: u64,
    pub elapsed: Duration,
}

/// Drives one source through classification and batching into a writer.
///
/// Everything runs sequentially on the calling task: no document is read
/// while a batch write (or its backoff) is pending.
pub struct Runtime<S> {
    writer: BatchWriter<S>,
    clear_policy: ClearPolicy,
}

impl<S: RecordStore> Runtime<S> {
    pub fn new(writer: BatchWriter<S>) -> Self {
        Self {
            writer,
            clear_policy: ClearPolicy::default(),
        }
    }

    pub fn clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    pub fn writer(&self) -> &BatchWriter<S> {
        &self.writer
    }

    /// Run `source` to completion. The first fatal error ends the run; batches
    /// flushed before it stay written.
    pub async fn run<D>(&self, source: &mut D) -> Result<RunReport>
    where
        D: DocumentSource + ?Sized,
    {
        let started = Instant::now();
        let mut report = RunReport {
            cleared: self.clear_prior_state().await?,
            ..RunReport::default()
        };

        #[cfg(feature = "tracing")]
        tracing::event!(
            tracing::Level::INFO,
            event = "pagesync.enumerate.start",
            source = %source.describe(),
            "enumerating {}",
            source.describe()
        );

        let mut batches = Accumulator::new(BATCH_THRESHOLD);
        while let Some(doc) = source.next_document().await? {
            if !is_marker_key(&doc.key) {
                #[cfg(feature = "tracing")]
                tracing::event!(tracing::Level::DEBUG, event = "pagesync.document.skipped", key = %doc.key, "pagesync.document.skipped");
                report.skipped += 1;
                continue;
            }

            let parsed = doc.parse()?;
            let record = classify(&parsed, &doc.key);

            #[cfg(feature = "tracing")]
            tracing::event!(
                tracing::Level::DEBUG,
                event = "pagesync.document.classified",
                key = %doc.key,
                kind = record.kind().as_str(),
                path = record.path(),
                "pagesync.document.classified"
            );

            match record.kind() {
                RecordKind::Page => report.pages += 1,
                RecordKind::Section => report.sections += 1,
            }

            match batches.push(record) {
                Some(RecordKind::Page) => {
                    self.flush_pages(batches.take_pages(), &mut report).await?
                }
                Some(RecordKind::Section) => {
                    self.flush_sections(batches.take_sections(), &mut report)
                }
                None => {}
            }
        }

        self.flush_pages(batches.take_pages(), &mut report).await?;
        self.flush_sections(batches.take_sections(), &mut report);

        report.elapsed = started.elapsed();

        #[cfg(feature = "tracing")]
        tracing::event!(
            tracing::Level::INFO,
            event = "pagesync.enumerate.done",
            pages = report.pages,
            sections = report.sections,
            page_batches = report.page_batches,
            skipped = report.skipped,
            "found {} pages and {} sections",
            report.pages,
            report.sections
        );

        Ok(report)
    }

    async fn clear_prior_state(&self) -> Result<u64> {
        let store = self.writer.store();
        match self.clear_policy {
            ClearPolicy::Retain => {
                #[cfg(feature = "tracing")]
                tracing::event!(
                    tracing::Level::INFO,
                    event = "pagesync.clear.skipped",
                    table = store.name(),
                    "keeping existing rows in {}; rows for removed documents are not cleaned up",
                    store.name()
                );
                Ok(0)
            }
            ClearPolicy::ScanAndDelete => {
                let removed = store.clear().await.map_err(Error::Store)?;
                #[cfg(feature = "tracing")]
                tracing::event!(
                    tracing::Level::INFO,
                    event = "pagesync.clear.done",
                    table = store.name(),
                    removed = removed,
                    "cleared {} rows from {}",
                    removed,
                    store.name()
                );
                Ok(removed)
            }
        }
    }

    async fn flush_pages(&self, rows: Vec<PageRecord>, report: &mut RunReport) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.writer.write_batch(&rows).await?;
        report.page_batches += 1;
        Ok(())
    }

    // Sections are not persisted; the batch is only accounted for.
    fn flush_sections(&self, sections: Vec<SectionRecord>, report: &mut RunReport) {
        if sections.is_empty() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::event!(
            tracing::Level::INFO,
            event = "pagesync.sections.flushed",
            sections = sections.len(),
            "flushing section batch of {}",
            sections.len()
        );
        report.section_batches += 1;
    }
}
