//! Tab session: one navigation bar paired with one engine view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::EngineView;
use crate::error::TabError;
use crate::state::TabState;
use crate::Result;

/// Label shown on a tab until its first page load completes.
pub const HOME_LABEL: &str = "Home";

/// Stable handle for a tab, carried on every engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TabId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug)]
pub struct TabSession<V: EngineView> {
    id: TabId,
    /// `None` once released
    view: Option<V>,
    /// Navigation bar contents
    url_bar_text: String,
    /// Tab label
    title: String,
    state: TabState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<V: EngineView> TabSession<V> {
    pub fn new(id: TabId, view: V) -> Self {
        let now = Utc::now();

        Self {
            id,
            view: Some(view),
            url_bar_text: String::new(),
            title: HOME_LABEL.to_string(),
            state: TabState::Loading,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url_bar_text(&self) -> &str {
        &self.url_bar_text
    }

    pub fn state(&self) -> TabState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn view(&self) -> Result<&V> {
        self.view
            .as_ref()
            .ok_or_else(|| TabError::Closed(self.id.to_string()))
    }

    fn view_mut(&mut self) -> Result<&mut V> {
        let id = self.id;
        self.view
            .as_mut()
            .ok_or_else(|| TabError::Closed(id.to_string()))
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_state: TabState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            tab_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Tab state transition"
        );

        self.state = new_state;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Engine reported navigation start
    pub fn mark_loading(&mut self) -> Result<()> {
        self.transition_to(TabState::Loading)
    }

    /// Engine reported navigation finished; takes the engine's page title as
    /// the tab label. An untitled page keeps the previous label.
    pub fn mark_loaded(&mut self) -> Result<()> {
        self.transition_to(TabState::Loaded)?;
        self.refresh_title()
    }

    /// Take the engine's page title as the label, unless it is empty.
    pub fn refresh_title(&mut self) -> Result<()> {
        let title = self.view()?.title();
        if !title.is_empty() && title != self.title {
            self.title = title;
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn set_url_bar_text(&mut self, text: impl Into<String>) {
        self.url_bar_text = text.into();
        self.updated_at = Utc::now();
    }

    /// Raw URL the engine is showing
    pub fn current_url(&self) -> Result<String> {
        Ok(self.view()?.url())
    }

    pub fn navigate(&mut self, url: &str) -> Result<()> {
        tracing::debug!(tab_id = %self.id, url = %url, "Navigate");
        Ok(self.view_mut()?.load(url)?)
    }

    pub fn back(&mut self) -> Result<()> {
        Ok(self.view_mut()?.back()?)
    }

    pub fn forward(&mut self) -> Result<()> {
        Ok(self.view_mut()?.forward()?)
    }

    pub fn reload(&mut self) -> Result<()> {
        Ok(self.view_mut()?.reload()?)
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        Ok(self.view_mut()?.set_visible(visible)?)
    }

    /// Move to `Closed` and release the engine view.
    ///
    /// The tab is closed even if the engine reports an error while tearing
    /// the view down; that error is returned for logging.
    pub fn close(&mut self) -> Result<()> {
        self.transition_to(TabState::Closed)?;

        match self.view.take() {
            Some(mut view) => Ok(view.release()?),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}
