//! Engine-view seam
//!
//! The embedded browser engine renders, fetches and runs scripts. The shell
//! only needs to drive navigation and read back the URL and title.

use thiserror::Error;

use crate::tab::TabId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Engine rejected URL: {0}")]
    InvalidUrl(String),

    #[error("Engine backend error: {0}")]
    Backend(String),
}

/// One embedded browser view, exclusively owned by a tab session.
pub trait EngineView {
    /// Start loading `url`. Load failures after this returns are the engine's
    /// business (it shows its own error page).
    fn load(&mut self, url: &str) -> Result<(), EngineError>;

    fn back(&mut self) -> Result<(), EngineError>;

    fn forward(&mut self) -> Result<(), EngineError>;

    fn reload(&mut self) -> Result<(), EngineError>;

    /// URL currently committed in the view, as reported by the engine.
    fn url(&self) -> String;

    /// Document title reported by the engine; empty if none.
    fn title(&self) -> String;

    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError>;

    /// Tear down the native browser context. Called exactly once, on close.
    fn release(&mut self) -> Result<(), EngineError>;
}

/// Creates engine views for new tabs.
pub trait EngineFactory {
    type View: EngineView;

    /// Create a view for tab `id` and start loading `url`.
    ///
    /// Every event the view later emits must carry `id`.
    fn create(&mut self, id: TabId, url: &str) -> Result<Self::View, EngineError>;
}
