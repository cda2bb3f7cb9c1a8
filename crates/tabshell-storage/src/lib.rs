//! TabShell Storage Layer
//!
//! Plain JSON files under the user-data root:
//! - `user/bookmarks.json`: array of `{ "url", "title" }`
//! - `user/history.json`: same shape, appended on every URL change
//! - `pages/renames.json`: flat `string -> string` substitution map
//!
//! A missing file is "no prior data". A malformed file is a
//! [`StorageError::DataCorruption`] for the caller to log and recover from.

mod bookmarks;
mod error;
mod history;
mod json_file;
mod renames;
mod storage;

pub use bookmarks::{BookmarkEntry, BookmarkStore};
pub use error::StorageError;
pub use history::{HistoryEntry, HistoryLog, HistoryPersistence};
pub use renames::RenameMap;
pub use storage::{Storage, StoragePaths};

pub type Result<T> = std::result::Result<T, StorageError>;
