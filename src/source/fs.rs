use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use walkdir::WalkDir;

use crate::document::{RawDocument, MARKER_FILE};
use crate::error::Result;
use crate::source::DocumentSource;

/// Walks a directory tree and yields every `index.json` below it.
///
/// Entries are visited depth-first in file name order. Keys are `/`-joined
/// paths relative to the root, e.g. `guides/setup/index.json`. Symlinks are
/// followed by default; a link back into one of its own ancestors is skipped.
///
/// The walk runs once, on the first call to `next_document`, on the blocking
/// pool. Bodies are read lazily as documents are pulled.
pub struct FsSource {
    root: PathBuf,
    follow_links: bool,
    pending: Option<VecDeque<(String, PathBuf)>>,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: true,
            pending: None,
        }
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    async fn scan(&self) -> Result<VecDeque<(String, PathBuf)>> {
        let root = self.root.clone();
        let follow_links = self.follow_links;
        tokio::task::spawn_blocking(move || collect_markers(&root, follow_links)).await?
    }
}

fn collect_markers(root: &Path, follow_links: bool) -> Result<VecDeque<(String, PathBuf)>> {
    let mut found = VecDeque::new();
    let walker = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.loop_ancestor().is_some() => {
                #[cfg(feature = "tracing")]
                tracing::event!(
                    tracing::Level::WARN,
                    event = "pagesync.source.link_loop",
                    path = %err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    "skipping symlink loop"
                );
                continue;
            }
            Err(err) => return Err(std::io::Error::from(err).into()),
        };

        if !entry.file_type().is_file() || entry.file_name() != MARKER_FILE {
            continue;
        }

        let Some(key) = relative_key(root, entry.path()) else {
            #[cfg(feature = "tracing")]
            tracing::event!(
                tracing::Level::WARN,
                event = "pagesync.source.unrepresentable",
                path = %entry.path().display(),
                "skipping marker whose path is not valid UTF-8"
            );
            continue;
        };
        found.push_back((key, entry.into_path()));
    }
    Ok(found)
}

/// `/`-joined path of `path` below `root`, or `None` when a component is not
/// valid UTF-8.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

#[async_trait]
impl DocumentSource for FsSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        if self.pending.is_none() {
            self.pending = Some(self.scan().await?);
        }
        let Some((key, path)) = self.pending.as_mut().and_then(VecDeque::pop_front) else {
            return Ok(None);
        };
        let body = tokio::fs::read(&path).await?;
        Ok(Some(RawDocument::new(key, Bytes::from(body))))
    }
}
