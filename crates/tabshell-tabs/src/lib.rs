//! TabShell Tab Sessions
//!
//! A tab session pairs one navigation bar with one engine view. The engine
//! itself is opaque: the GUI shell supplies an [`EngineFactory`] and every
//! view it creates is tagged with the [`TabId`] of the session that owns it.

mod engine;
mod error;
mod state;
mod tab;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use engine::{EngineError, EngineFactory, EngineView};
pub use error::TabError;
pub use state::TabState;
pub use tab::{TabId, TabSession, HOME_LABEL};

pub type Result<T> = std::result::Result<T, TabError>;
