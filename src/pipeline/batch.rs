use std::mem;

use crate::record::{ClassifiedRecord, PageRecord, RecordKind, SectionRecord};

/// Records per kind accumulated before a flush is due.
pub const BATCH_THRESHOLD: usize = 20;

/// Fixed-threshold buffer for one record kind.
///
/// `push` reports when the buffer has reached its threshold. The owner is
/// expected to [`take`](Self::take) the contents before pushing again.
#[derive(Debug, Clone)]
pub struct BatchBuffer<T> {
    items: Vec<T>,
    threshold: usize,
}

impl<T> BatchBuffer<T> {
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            items: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Append `item`; returns `true` once the buffer is full and must be flushed.
    pub fn push(&mut self, item: T) -> bool {
        debug_assert!(
            self.items.len() < self.threshold,
            "batch pushed past its threshold without a flush"
        );
        self.items.push(item);
        self.is_full()
    }

    /// Drain the buffer for flushing, leaving it empty with full capacity.
    pub fn take(&mut self) -> Vec<T> {
        mem::replace(&mut self.items, Vec::with_capacity(self.threshold))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.threshold
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for BatchBuffer<T> {
    fn default() -> Self {
        Self::new(BATCH_THRESHOLD)
    }
}

/// Page and section buffers, filled independently. Performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    pages: BatchBuffer<PageRecord>,
    sections: BatchBuffer<SectionRecord>,
}

impl Accumulator {
    pub fn new(threshold: usize) -> Self {
        Self {
            pages: BatchBuffer::new(threshold),
            sections: BatchBuffer::new(threshold),
        }
    }

    /// Route `record` to its kind's buffer. Returns the kind whose buffer is
    /// now full, if any.
    pub fn push(&mut self, record: ClassifiedRecord) -> Option<RecordKind> {
        let kind = record.kind();
        let full = match record {
            ClassifiedRecord::Page(page) => self.pages.push(page),
            ClassifiedRecord::Section(section) => self.sections.push(section),
        };
        full.then_some(kind)
    }

    pub fn take_pages(&mut self) -> Vec<PageRecord> {
        self.pages.take()
    }

    pub fn take_sections(&mut self) -> Vec<SectionRecord> {
        self.sections.take()
    }

    pub fn pages(&self) -> &BatchBuffer<PageRecord> {
        &self.pages
    }

    pub fn sections(&self) -> &BatchBuffer<SectionRecord> {
        &self.sections
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.sections.clear();
    }
}
