//! Browsing history log

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::json_file::{read_json, write_json};
use crate::Result;

/// Appends held in memory before the file is rewritten.
const FLUSH_BATCH: usize = 32;
/// Oldest a pending append gets before the next append forces a write.
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }
}

/// Whether appended history survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPersistence {
    /// Write appends back to the history file in batches
    Disk,
    /// Keep appends in memory only; the file is read at startup but never written
    SessionOnly,
}

/// Append-only, ordered history log.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    persistence: HistoryPersistence,
    entries: Vec<HistoryEntry>,
    unsaved: usize,
    last_flush: Option<Instant>,
}

impl HistoryLog {
    pub fn load(path: impl Into<PathBuf>, persistence: HistoryPersistence) -> Result<Self> {
        let path = path.into();
        let entries = read_json(&path)?.unwrap_or_default();
        Ok(Self {
            path,
            persistence,
            entries,
            unsaved: 0,
            last_flush: None,
        })
    }

    pub fn empty(path: impl Into<PathBuf>, persistence: HistoryPersistence) -> Self {
        Self {
            path: path.into(),
            persistence,
            entries: Vec::new(),
            unsaved: 0,
            last_flush: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persistence(&self) -> HistoryPersistence {
        self.persistence
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends not yet written to disk.
    pub fn unsaved(&self) -> usize {
        self.unsaved
    }

    /// Append an entry. A persistent log writes itself out on the first
    /// append, then once `FLUSH_BATCH` appends pile up or the last write is
    /// older than `FLUSH_INTERVAL`; call [`HistoryLog::flush_pending`] before
    /// exit for the rest.
    ///
    /// The entry stays in memory even if the flush fails.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        tracing::trace!(url = %entry.url, "History append");
        self.entries.push(entry);

        if self.persistence == HistoryPersistence::SessionOnly {
            return Ok(());
        }

        self.unsaved += 1;
        let stale = self
            .last_flush
            .map_or(true, |at| at.elapsed() >= FLUSH_INTERVAL);
        if stale || self.unsaved >= FLUSH_BATCH {
            self.flush()?;
        }
        Ok(())
    }

    /// Write pending appends, if any.
    pub fn flush_pending(&mut self) -> Result<()> {
        if self.unsaved == 0 {
            return Ok(());
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        write_json(&self.path, &self.entries)?;
        tracing::debug!(entries = self.entries.len(), written = self.unsaved, "History flushed");
        self.unsaved = 0;
        self.last_flush = Some(Instant::now());
        Ok(())
    }
}
