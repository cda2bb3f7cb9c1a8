//! TabShell Core
//!
//! Configuration, engine settings and startup for the TabShell browser shell.
//! The GUI shell owns one [`Browser`] and routes every event through it.

mod browser;
mod config;
mod engine_settings;
mod error;

pub use browser::Browser;
pub use config::{Config, Settings, WindowSettings};
pub use engine_settings::EngineSettings;
pub use error::CoreError;

// Re-export core components
pub use tabshell_navigation::{InputResolver, NavAction};
pub use tabshell_session::{
    CloseOutcome, DispatchOutcome, EngineEvent, HistoryDialog, SessionError, SessionManager,
    ShellEvent, TabSnapshot, TabTarget,
};
pub use tabshell_storage::{BookmarkEntry, HistoryEntry, HistoryPersistence, StorageError};
pub use tabshell_tabs::{
    EngineError, EngineFactory, EngineView, TabError, TabId, TabState, HOME_LABEL,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
