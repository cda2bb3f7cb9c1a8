//! Bookmark persistence

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::json_file::{read_json, write_json};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub url: String,
    /// Always empty for bookmarks created by the shell
    #[serde(default)]
    pub title: String,
}

impl BookmarkEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }
}

/// Ordered bookmark list backed by a single JSON file.
///
/// Entries are only ever appended; duplicates are kept in insertion order.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
    entries: Vec<BookmarkEntry>,
}

impl BookmarkStore {
    /// Load bookmarks from `path`; a missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_json(&path)?.unwrap_or_default();
        Ok(Self { path, entries })
    }

    /// An empty store that will write to `path` on the next save.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[BookmarkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a bookmark in memory. Call [`save`](Self::save) to persist.
    pub fn add(&mut self, url: impl Into<String>) -> &BookmarkEntry {
        self.entries.push(BookmarkEntry::new(url));
        tracing::debug!(path = %self.path.display(), count = self.entries.len(), "Bookmark added");
        &self.entries[self.entries.len() - 1]
    }

    /// Overwrite the backing file with the full list.
    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.entries)?;
        tracing::debug!(path = %self.path.display(), count = self.entries.len(), "Saved bookmarks");
        Ok(())
    }
}
