//! Classification of parsed documents into store records.

pub mod path;
pub mod search;

use serde::Serialize;

use crate::document::{Metadata, ParsedDocument};
use path::{canonicalize, grandparent_path, parent_path};
use search::build_search_content;

/// Row persisted for a leaf document. `page_path` is the row key.
///
/// Serializes with the table's attribute names (`pagePath`, `pageSection`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub page_path: String,
    pub page_section: String,
    pub page_date: String,
    pub page_search_content: String,
    pub object_key: String,
    pub metadata: String,
}

/// A document with children. Classified and counted, not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub section_path: String,
    pub object_key: String,
    pub child_count: usize,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Page,
    Section,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedRecord {
    Page(PageRecord),
    Section(SectionRecord),
}

impl ClassifiedRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Page(_) => RecordKind::Page,
            Self::Section(_) => RecordKind::Section,
        }
    }

    /// Canonical path of the record, whichever kind it is.
    pub fn path(&self) -> &str {
        match self {
            Self::Page(page) => &page.page_path,
            Self::Section(section) => &section.section_path,
        }
    }
}

/// Decide whether `doc` (read from `key`) is a section or a page.
///
/// A page's section is the directory above its own: for
/// `/guides/setup/index.json` the page is `/guides/setup` and its section is
/// `/guides`.
pub fn classify(doc: &ParsedDocument, key: &str) -> ClassifiedRecord {
    let own_path = canonicalize(parent_path(key));

    if doc.has_children() {
        return ClassifiedRecord::Section(SectionRecord {
            section_path: own_path,
            object_key: key.to_string(),
            child_count: doc.child_count(),
            metadata: doc.metadata.clone(),
        });
    }

    ClassifiedRecord::Page(PageRecord {
        page_path: own_path,
        page_section: canonicalize(grandparent_path(key)),
        page_date: doc.date.clone().unwrap_or_default(),
        page_search_content: build_search_content(doc),
        object_key: key.to_string(),
        metadata: doc.metadata_json(),
    })
}
