//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Session has shut down")]
    ShutDown,

    #[error("Tab error: {0}")]
    Tab(#[from] tabshell_tabs::TabError),

    #[error("Storage error: {0}")]
    Storage(#[from] tabshell_storage::StorageError),
}
