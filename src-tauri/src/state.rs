//! Application state management
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use tabshell_core::{Browser, CoreError, HistoryDialog, Result, SessionError};

use crate::engine::TauriEngine;
use crate::pump::PumpMessage;

/// Thread-safe application state wrapper
///
/// Commands read through [`AppState::with_browser`]; every mutation is queued
/// with [`AppState::queue`] and applied by the event pump.
pub struct AppState {
    browser: Arc<RwLock<Option<Browser<TauriEngine>>>>,
    history_dialog: Arc<Mutex<Option<HistoryDialog>>>,
    events: UnboundedSender<PumpMessage>,
}

impl AppState {
    pub fn new(browser: Browser<TauriEngine>, events: UnboundedSender<PumpMessage>) -> Self {
        Self {
            browser: Arc::new(RwLock::new(Some(browser))),
            history_dialog: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn with_browser<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Browser<TauriEngine>) -> Result<T>,
    {
        let guard = self.browser.read();
        match guard.as_ref() {
            Some(browser) => f(browser),
            None => Err(CoreError::NotInitialized),
        }
    }

    /// Only the event pump calls this.
    pub(crate) fn with_browser_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Browser<TauriEngine>) -> Result<T>,
    {
        let mut guard = self.browser.write();
        match guard.as_mut() {
            Some(browser) => f(browser),
            None => Err(CoreError::NotInitialized),
        }
    }

    /// Write pending history on exit. Gives up if the pump holds the
    /// browser for too long, since the pump may be waiting on this thread.
    pub(crate) fn flush_history(&self) {
        match self.browser.try_write_for(Duration::from_millis(500)) {
            Some(mut guard) => {
                if let Some(browser) = guard.as_mut() {
                    browser.session_mut().flush_history();
                }
            }
            None => tracing::warn!("Browser busy at exit, history not flushed"),
        }
    }

    pub fn queue(&self, message: PumpMessage) -> Result<()> {
        self.events
            .send(message)
            .map_err(|_| CoreError::Session(SessionError::ShutDown))
    }

    pub fn history_dialog(&self) -> Option<HistoryDialog> {
        self.history_dialog.lock().clone()
    }

    /// The open history dialog, if any. Lock before the browser, never after.
    pub(crate) fn history_dialog_slot(&self) -> MutexGuard<'_, Option<HistoryDialog>> {
        self.history_dialog.lock()
    }
}
