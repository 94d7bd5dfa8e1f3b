use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{Error, Result};

/// File name that marks a directory as one ingestible document.
pub const MARKER_FILE: &str = "index.json";

/// Whether `key` names a marker file, either at the collection root or below it.
pub fn is_marker_key(key: &str) -> bool {
    match key.strip_suffix(MARKER_FILE) {
        Some(rest) => rest.is_empty() || rest.ends_with('/'),
        None => false,
    }
}

/// One file yielded by a [`DocumentSource`](crate::source::DocumentSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub key: String,
    pub body: Bytes,
}

impl RawDocument {
    pub fn new(key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
        }
    }

    pub fn parse(&self) -> Result<ParsedDocument> {
        serde_json::from_slice(&self.body).map_err(|err| Error::parse(&self.key, err))
    }
}

/// Child entries are opaque; only their presence matters.
pub type ChildRef = JsonValue;

/// Decoded descriptor. Every field is optional and `null` reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParsedDocument {
    pub children: Option<Vec<ChildRef>>,
    pub metadata: Option<Metadata>,
    pub summary: Option<String>,
    pub plain: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
}

impl ParsedDocument {
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    pub fn categories(&self) -> &[String] {
        self.metadata
            .as_ref()
            .and_then(|m| m.categories.as_deref())
            .unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        self.metadata
            .as_ref()
            .and_then(|m| m.tags.as_deref())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or_default()
    }

    /// Metadata serialized back to JSON text; `"null"` when the document has none.
    pub fn metadata_json(&self) -> String {
        serde_json::to_string(&self.metadata).unwrap_or_else(|_| String::from("null"))
    }
}

/// Document metadata. Fields beyond the searchable ones are kept verbatim so
/// they survive into the stored metadata blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}
