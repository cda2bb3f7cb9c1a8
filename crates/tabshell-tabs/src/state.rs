//! Tab State Machine
//!
//! ```text
//! Loading <-> Loaded
//!    \         /
//!     v       v
//!      Closed   (terminal)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Engine reported navigation start
    Loading,
    /// Engine reported navigation finished
    Loaded,
    /// Engine view released, tab removed
    Closed,
}

impl TabState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: TabState) -> bool {
        match (self, target) {
            (TabState::Closed, _) => false,
            (_, TabState::Closed) => true,
            (TabState::Loading, TabState::Loaded) => true,
            (TabState::Loaded, TabState::Loading) => true,
            (a, b) => *a == b,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TabState::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Loading => "loading",
            TabState::Loaded => "loaded",
            TabState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loading" => Ok(TabState::Loading),
            "loaded" => Ok(TabState::Loaded),
            "closed" => Ok(TabState::Closed),
            _ => Err(format!("Unknown tab state: {}", s)),
        }
    }
}
