//! TabShell Session Management
//!
//! The session manager owns the ordered tab collection. Every GUI signal and
//! engine callback arrives as a [`ShellEvent`] tagged with the [`TabId`] of
//! the tab it concerns; [`SessionManager::dispatch`] routes it to that tab.
//!
//! Closing the last tab shuts the session down. That happens exactly once and
//! the manager refuses further work afterwards.
//!
//! [`TabId`]: tabshell_tabs::TabId

mod dialog;
mod error;
mod event;
mod manager;

pub use dialog::HistoryDialog;
pub use error::SessionError;
pub use event::{CloseOutcome, DispatchOutcome, EngineEvent, ShellEvent, TabTarget};
pub use manager::{SessionManager, TabSnapshot};

pub type Result<T> = std::result::Result<T, SessionError>;
