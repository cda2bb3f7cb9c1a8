//! In-memory engine that records every call, for tests.
//!
//! Views never commit navigations on their own; tests drive URL and title
//! changes through [`FakeEngine::set_url`] and [`FakeEngine::set_title`] the
//! way a real engine would report them.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{EngineError, EngineFactory, EngineView};
use crate::tab::TabId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Create(String),
    Load(String),
    Back,
    Forward,
    Reload,
    Show,
    Hide,
    Release,
}

#[derive(Debug, Default)]
struct ViewRecord {
    url: String,
    title: String,
    visible: bool,
    released: bool,
    calls: Vec<EngineCall>,
}

#[derive(Debug, Default)]
struct Shared {
    views: HashMap<TabId, ViewRecord>,
    /// Creation order
    order: Vec<TabId>,
    reject_prefix: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    shared: Arc<Mutex<Shared>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` and `load` fail for URLs starting with `prefix`.
    pub fn reject_urls_starting_with(&self, prefix: impl Into<String>) {
        self.shared.lock().reject_prefix = Some(prefix.into());
    }

    pub fn set_url(&self, id: TabId, url: impl Into<String>) {
        if let Some(view) = self.shared.lock().views.get_mut(&id) {
            view.url = url.into();
        }
    }

    pub fn set_title(&self, id: TabId, title: impl Into<String>) {
        if let Some(view) = self.shared.lock().views.get_mut(&id) {
            view.title = title.into();
        }
    }

    pub fn calls(&self, id: TabId) -> Vec<EngineCall> {
        self.shared
            .lock()
            .views
            .get(&id)
            .map(|v| v.calls.clone())
            .unwrap_or_default()
    }

    /// Last URL passed to `create` or `load` for `id`.
    pub fn last_requested_url(&self, id: TabId) -> Option<String> {
        self.calls(id).into_iter().rev().find_map(|call| match call {
            EngineCall::Create(url) | EngineCall::Load(url) => Some(url),
            _ => None,
        })
    }

    pub fn is_visible(&self, id: TabId) -> bool {
        self.shared
            .lock()
            .views
            .get(&id)
            .is_some_and(|v| v.visible)
    }

    pub fn is_released(&self, id: TabId) -> bool {
        self.shared
            .lock()
            .views
            .get(&id)
            .is_some_and(|v| v.released)
    }

    /// Views created so far, oldest first.
    pub fn created(&self) -> Vec<TabId> {
        self.shared.lock().order.clone()
    }

    /// Views not yet released.
    pub fn live_count(&self) -> usize {
        self.shared
            .lock()
            .views
            .values()
            .filter(|v| !v.released)
            .count()
    }
}

impl EngineFactory for FakeEngine {
    type View = FakeView;

    fn create(&mut self, id: TabId, url: &str) -> Result<FakeView, EngineError> {
        let mut shared = self.shared.lock();
        if let Some(prefix) = &shared.reject_prefix {
            if url.starts_with(prefix.as_str()) {
                return Err(EngineError::InvalidUrl(url.to_string()));
            }
        }

        shared.views.insert(
            id,
            ViewRecord {
                url: url.to_string(),
                calls: vec![EngineCall::Create(url.to_string())],
                ..ViewRecord::default()
            },
        );
        shared.order.push(id);

        Ok(FakeView {
            id,
            shared: Arc::clone(&self.shared),
        })
    }
}

#[derive(Debug)]
pub struct FakeView {
    id: TabId,
    shared: Arc<Mutex<Shared>>,
}

impl FakeView {
    fn record(&self, call: EngineCall) -> Result<(), EngineError> {
        let mut shared = self.shared.lock();
        if let (Some(prefix), EngineCall::Load(url)) = (&shared.reject_prefix, &call) {
            if url.starts_with(prefix.as_str()) {
                return Err(EngineError::InvalidUrl(url.clone()));
            }
        }

        let view = shared
            .views
            .get_mut(&self.id)
            .ok_or_else(|| EngineError::Backend(format!("unknown view {}", self.id)))?;
        if view.released {
            return Err(EngineError::Backend(format!("view {} released", self.id)));
        }

        match call {
            EngineCall::Show => view.visible = true,
            EngineCall::Hide => view.visible = false,
            EngineCall::Release => {
                view.visible = false;
                view.released = true;
            }
            _ => {}
        }
        view.calls.push(call);
        Ok(())
    }
}

impl EngineView for FakeView {
    fn load(&mut self, url: &str) -> Result<(), EngineError> {
        self.record(EngineCall::Load(url.to_string()))
    }

    fn back(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Back)
    }

    fn forward(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Forward)
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Reload)
    }

    fn url(&self) -> String {
        self.shared
            .lock()
            .views
            .get(&self.id)
            .map(|v| v.url.clone())
            .unwrap_or_default()
    }

    fn title(&self) -> String {
        self.shared
            .lock()
            .views
            .get(&self.id)
            .map(|v| v.title.clone())
            .unwrap_or_default()
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError> {
        self.record(if visible {
            EngineCall::Show
        } else {
            EngineCall::Hide
        })
    }

    fn release(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Release)
    }
}
