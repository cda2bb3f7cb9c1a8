//! Events the GUI shell feeds into the session, and what comes back out

use serde::{Deserialize, Serialize};

use tabshell_navigation::NavAction;
use tabshell_tabs::TabId;

use crate::dialog::HistoryDialog;

/// Which tab a select or close applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabTarget {
    /// Position in the tab strip
    Index(usize),
    /// Owning handle; stays valid while other tabs open and close
    Id(TabId),
}

/// Callbacks from an engine view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    LoadStarted,
    LoadFinished,
    UrlChanged(String),
    /// Page title changed after load, e.g. set by script
    TitleChanged,
    /// Page script asked to close its window
    CloseRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The "+" button
    NewTab,
    /// Open a new tab at a specific URL
    OpenUrl(String),
    SelectTab(TabTarget),
    CloseTab(TabTarget),
    Engine { tab: TabId, event: EngineEvent },
    Toolbar { tab: TabId, action: NavAction },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed { remaining: usize },
    /// The collection is empty; the application should exit
    LastTabClosed,
}

#[derive(Debug)]
pub enum DispatchOutcome {
    Handled,
    /// Stale engine event for a tab that no longer exists
    Ignored,
    TabOpened(TabId),
    TabClosed { remaining: usize },
    /// Last tab closed; raised once per session
    Shutdown,
    ShowHistory(HistoryDialog),
}

impl DispatchOutcome {
    /// True when the GUI should redraw tab labels or navigation bars.
    pub fn changes_tabs(&self) -> bool {
        !matches!(self, DispatchOutcome::Ignored | DispatchOutcome::ShowHistory(_))
    }
}

impl From<CloseOutcome> for DispatchOutcome {
    fn from(outcome: CloseOutcome) -> Self {
        match outcome {
            CloseOutcome::Closed { remaining } => DispatchOutcome::TabClosed { remaining },
            CloseOutcome::LastTabClosed => DispatchOutcome::Shutdown,
        }
    }
}
