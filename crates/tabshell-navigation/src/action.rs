//! Per-tab toolbar actions

use serde::{Deserialize, Serialize};

/// Everything the navigation bar of a tab can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "text", rename_all = "snake_case")]
pub enum NavAction {
    Back,
    Forward,
    Reload,
    /// Return pressed in the URL bar
    Submit(String),
    /// Bookmark the page currently shown
    Bookmark,
    ShowHistory,
}

impl NavAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavAction::Back => "back",
            NavAction::Forward => "forward",
            NavAction::Reload => "reload",
            NavAction::Submit(_) => "submit",
            NavAction::Bookmark => "bookmark",
            NavAction::ShowHistory => "show_history",
        }
    }
}

impl std::fmt::Display for NavAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
