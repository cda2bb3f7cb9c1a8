//! Storage bundle opened once at startup

use std::fs;
use std::path::{Path, PathBuf};

use crate::bookmarks::BookmarkStore;
use crate::error::StorageError;
use crate::history::{HistoryLog, HistoryPersistence};
use crate::renames::RenameMap;

/// File locations, resolved from the application config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub bookmarks: PathBuf,
    pub history: PathBuf,
    pub renames: PathBuf,
}

/// Everything the session layer persists or consults.
#[derive(Debug, Clone)]
pub struct Storage {
    pub bookmarks: BookmarkStore,
    pub history: HistoryLog,
    pub renames: RenameMap,
}

impl Storage {
    /// Open all stores, recovering from unreadable files.
    ///
    /// A corrupt or unreadable bookmark/history file is logged and replaced by
    /// an empty in-memory collection; startup never fails on bad data. Corrupt
    /// files are first moved aside to `<name>.json.corrupt` so the next save
    /// does not overwrite them.
    pub fn open(paths: &StoragePaths, persistence: HistoryPersistence) -> Self {
        let bookmarks = BookmarkStore::load(&paths.bookmarks).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load bookmarks, starting empty");
            set_aside_if_corrupt(&paths.bookmarks, &e);
            BookmarkStore::empty(&paths.bookmarks)
        });

        let history = HistoryLog::load(&paths.history, persistence).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load history, starting empty");
            set_aside_if_corrupt(&paths.history, &e);
            HistoryLog::empty(&paths.history, persistence)
        });

        tracing::info!(
            bookmarks = bookmarks.len(),
            history = history.len(),
            ?persistence,
            "Storage opened"
        );

        Self {
            bookmarks,
            history,
            renames: RenameMap::new(&paths.renames),
        }
    }
}

fn set_aside_if_corrupt(path: &Path, error: &StorageError) {
    if !error.is_corruption() {
        return;
    }

    let moved = path.with_extension("json.corrupt");
    match fs::rename(path, &moved) {
        Ok(()) => tracing::warn!(path = %moved.display(), "Corrupt file kept"),
        Err(e) => tracing::error!(
            path = %path.display(),
            error = %e,
            "Failed to move corrupt file aside"
        ),
    }
}
