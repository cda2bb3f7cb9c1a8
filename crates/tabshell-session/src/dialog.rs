//! History viewer
//!
//! A snapshot of the history log taken when the dialog opens. It does not
//! follow later appends.

use serde::Serialize;

use tabshell_storage::HistoryEntry;
use tabshell_tabs::{EngineFactory, TabId};

use crate::error::SessionError;
use crate::manager::SessionManager;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryDialog {
    entries: Vec<HistoryEntry>,
    selected: Option<usize>,
    open: bool,
}

impl HistoryDialog {
    pub fn new(entries: &[HistoryEntry]) -> Self {
        Self {
            entries: entries.to_vec(),
            selected: None,
            open: true,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Row labels, oldest first.
    pub fn items(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.url.as_str()).collect()
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Open the selected entry in a new tab and close the dialog.
    ///
    /// Entries are recorded under their display name when one exists, so the
    /// name is mapped back to the URL it was shown for first. With nothing selected this does
    /// nothing and the dialog stays open.
    pub fn load_selected<F: EngineFactory>(
        &mut self,
        session: &mut SessionManager<F>,
    ) -> Result<Option<TabId>> {
        if !self.open {
            return Ok(None);
        }
        let Some(entry) = self.selected() else {
            return Ok(None);
        };
        let Some(url) = session.resolver().target_for_display(&entry.url) else {
            return Ok(None);
        };

        let id = session.open_tab(Some(&url))?;
        tracing::info!(tab_id = %id, url = %url, "Reopened from history");

        self.open = false;
        Ok(Some(id))
    }
}
