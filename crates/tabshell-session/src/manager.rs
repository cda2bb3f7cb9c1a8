//! Session Manager
//!
//! Owns the ordered tab collection and is the only place tabs are created or
//! destroyed. Tab index in the collection is tab index in the GUI strip.

use serde::Serialize;

use tabshell_navigation::{InputResolver, NavAction};
use tabshell_storage::{BookmarkEntry, HistoryEntry, Storage};
use tabshell_tabs::{EngineFactory, TabError, TabId, TabSession, TabState};

use crate::dialog::HistoryDialog;
use crate::error::SessionError;
use crate::event::{CloseOutcome, DispatchOutcome, EngineEvent, ShellEvent, TabTarget};
use crate::Result;

/// Read-only view of one tab for the GUI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub index: usize,
    pub title: String,
    pub url_bar_text: String,
    pub state: TabState,
    pub is_current: bool,
}

pub struct SessionManager<F: EngineFactory> {
    engine: F,
    tabs: Vec<TabSession<F::View>>,
    current: Option<usize>,
    storage: Storage,
    resolver: InputResolver,
    new_tab_url: String,
    shut_down: bool,
}

impl<F: EngineFactory> SessionManager<F> {
    pub fn new(engine: F, storage: Storage, new_tab_url: impl Into<String>) -> Self {
        let resolver = InputResolver::new(storage.renames.clone());

        Self {
            engine,
            tabs: Vec::new(),
            current: None,
            storage,
            resolver,
            new_tab_url: new_tab_url.into(),
            shut_down: false,
        }
    }

    // === Queries ===

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn new_tab_url(&self) -> &str {
        &self.new_tab_url
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_tab_id(&self) -> Option<TabId> {
        self.current.and_then(|i| self.tabs.get(i)).map(|t| t.id())
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    pub fn tab(&self, id: TabId) -> Result<&TabSession<F::View>> {
        self.tabs
            .iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| SessionError::TabNotFound(id.to_string()))
    }

    pub fn tab_at(&self, index: usize) -> Result<&TabSession<F::View>> {
        self.tabs.get(index).ok_or(SessionError::IndexOutOfRange {
            index,
            len: self.tabs.len(),
        })
    }

    pub fn snapshots(&self) -> Vec<TabSnapshot> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| TabSnapshot {
                id: tab.id(),
                index,
                title: tab.title().to_string(),
                url_bar_text: tab.url_bar_text().to_string(),
                state: tab.state(),
                is_current: self.current == Some(index),
            })
            .collect()
    }

    pub fn bookmarks(&self) -> &[BookmarkEntry] {
        self.storage.bookmarks.entries()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.storage.history.entries()
    }

    pub fn resolver(&self) -> &InputResolver {
        &self.resolver
    }

    fn ensure_running(&self) -> Result<()> {
        if self.shut_down {
            Err(SessionError::ShutDown)
        } else {
            Ok(())
        }
    }

    fn index_for(&self, target: TabTarget) -> Result<usize> {
        match target {
            TabTarget::Index(index) if index < self.tabs.len() => Ok(index),
            TabTarget::Index(index) => Err(SessionError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            }),
            TabTarget::Id(id) => self
                .index_of(id)
                .ok_or_else(|| SessionError::TabNotFound(id.to_string())),
        }
    }

    fn tab_mut(&mut self, id: TabId) -> Result<&mut TabSession<F::View>> {
        self.tabs
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| SessionError::TabNotFound(id.to_string()))
    }

    // === Tab lifecycle ===

    /// Open a tab at `url`, or at the new-tab page when `None`.
    ///
    /// The tab is appended to the strip, labelled "Home" until its first load
    /// finishes, and becomes the current tab.
    pub fn open_tab(&mut self, url: Option<&str>) -> Result<TabId> {
        self.ensure_running()?;

        let url = url.unwrap_or(&self.new_tab_url).to_string();
        let id = TabId::new();
        let view = self.engine.create(id, &url).map_err(TabError::from)?;

        self.tabs.push(TabSession::new(id, view));
        let index = self.tabs.len() - 1;

        tracing::info!(tab_id = %id, index, url = %url, "Opened tab");

        self.select_tab(index)?;
        Ok(id)
    }

    pub fn open_new_tab(&mut self) -> Result<TabId> {
        self.open_tab(None)
    }

    /// Close a tab by index or handle and release its engine view.
    ///
    /// Closing the last tab shuts the session down.
    pub fn close_tab(&mut self, target: TabTarget) -> Result<CloseOutcome> {
        self.ensure_running()?;
        let index = self.index_for(target)?;

        let mut tab = self.tabs.remove(index);
        if let Err(e) = tab.close() {
            tracing::warn!(tab_id = %tab.id(), error = %e, "Engine view did not release cleanly");
        }

        tracing::info!(tab_id = %tab.id(), index, remaining = self.tabs.len(), "Closed tab");

        if self.tabs.is_empty() {
            self.current = None;
            self.shut_down = true;
            tracing::info!("Last tab closed, shutting down");
            self.flush_history();
            return Ok(CloseOutcome::LastTabClosed);
        }

        match self.current {
            Some(current) if current == index => {
                // Closed the visible tab; the one that slid into its place takes over
                self.current = None;
                let next = index.min(self.tabs.len() - 1);
                if let Err(e) = self.select_tab(next) {
                    tracing::warn!(index = next, error = %e, "Failed to show next tab");
                }
            }
            Some(current) if current > index => self.current = Some(current - 1),
            _ => {}
        }

        Ok(CloseOutcome::Closed {
            remaining: self.tabs.len(),
        })
    }

    /// Make the tab at `index` current: its view is shown, the previous
    /// current view is hidden.
    pub fn select_tab(&mut self, index: usize) -> Result<()> {
        self.ensure_running()?;

        if index >= self.tabs.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }

        if let Some(previous) = self.current.filter(|&p| p != index) {
            if let Some(tab) = self.tabs.get_mut(previous) {
                tab.set_visible(false)?;
            }
        }

        self.tabs[index].set_visible(true)?;
        self.current = Some(index);
        Ok(())
    }

    // === Engine callbacks ===

    pub fn on_load_started(&mut self, id: TabId) -> Result<()> {
        Ok(self.tab_mut(id)?.mark_loading()?)
    }

    /// Retitle the tab from the engine and refresh its navigation bar.
    pub fn on_navigation_finished(&mut self, id: TabId) -> Result<()> {
        let tab = self.tab_mut(id)?;
        tab.mark_loaded()?;

        let url = tab.current_url()?;
        if !url.is_empty() {
            let display = self.resolver.display_for(&url);
            self.tab_mut(id)?.set_url_bar_text(display);
        }

        tracing::debug!(tab_id = %id, title = %self.tab(id)?.title(), "Navigation finished");
        Ok(())
    }

    pub fn on_title_changed(&mut self, id: TabId) -> Result<()> {
        Ok(self.tab_mut(id)?.refresh_title()?)
    }

    /// Show the new URL (under its friendly name if it has one) and record it
    /// in history. Returns the text now in the navigation bar.
    pub fn on_url_changed(&mut self, id: TabId, url: &str) -> Result<String> {
        let display = self.resolver.display_for(url);
        self.tab_mut(id)?.set_url_bar_text(display.clone());

        if let Err(e) = self.storage.history.append(HistoryEntry::new(display.clone())) {
            tracing::warn!(tab_id = %id, error = %e, "Failed to persist history");
        }

        Ok(display)
    }

    // === Navigation bar ===

    /// Navigate to what the user typed, after rename resolution. Returns the
    /// URL handed to the engine, or `None` for blank input.
    pub fn submit_url_bar(&mut self, id: TabId, text: &str) -> Result<Option<String>> {
        let Some(target) = self.resolver.resolve_submission(text) else {
            return Ok(None);
        };

        let tab = self.tab_mut(id)?;
        tab.set_url_bar_text(text);
        tab.navigate(&target)?;

        tracing::info!(tab_id = %id, input = %text, url = %target, "Navigation bar submitted");
        Ok(Some(target))
    }

    pub fn back(&mut self, id: TabId) -> Result<()> {
        Ok(self.tab_mut(id)?.back()?)
    }

    pub fn forward(&mut self, id: TabId) -> Result<()> {
        Ok(self.tab_mut(id)?.forward()?)
    }

    pub fn reload(&mut self, id: TabId) -> Result<()> {
        Ok(self.tab_mut(id)?.reload()?)
    }

    /// Bookmark the URL the engine is showing in tab `id` and save.
    pub fn add_bookmark(&mut self, id: TabId) -> Result<BookmarkEntry> {
        let url = self.tab(id)?.current_url()?;
        let entry = self.storage.bookmarks.add(url).clone();
        self.storage.bookmarks.save()?;

        tracing::info!(tab_id = %id, url = %entry.url, "Bookmarked");
        Ok(entry)
    }

    /// Write history appends still held in memory. Call before exit.
    pub fn flush_history(&mut self) {
        if let Err(e) = self.storage.history.flush_pending() {
            tracing::warn!(error = %e, "Failed to flush history");
        }
    }

    pub fn history_dialog(&self) -> HistoryDialog {
        HistoryDialog::new(self.storage.history.entries())
    }

    // === Dispatch ===

    /// Route one GUI or engine event to the tab it concerns.
    pub fn dispatch(&mut self, event: ShellEvent) -> Result<DispatchOutcome> {
        tracing::trace!(?event, "Dispatch");

        match event {
            ShellEvent::NewTab => Ok(DispatchOutcome::TabOpened(self.open_new_tab()?)),
            ShellEvent::OpenUrl(url) => Ok(DispatchOutcome::TabOpened(self.open_tab(Some(&url))?)),
            ShellEvent::SelectTab(target) => {
                self.ensure_running()?;
                let index = self.index_for(target)?;
                self.select_tab(index)?;
                Ok(DispatchOutcome::Handled)
            }
            ShellEvent::CloseTab(target) => Ok(self.close_tab(target)?.into()),
            ShellEvent::Engine { tab, event } => self.dispatch_engine(tab, event),
            ShellEvent::Toolbar { tab, action } => self.dispatch_toolbar(tab, action),
        }
    }

    fn dispatch_engine(&mut self, id: TabId, event: EngineEvent) -> Result<DispatchOutcome> {
        // Engines keep firing for a moment after their view is released
        if self.shut_down || self.index_of(id).is_none() {
            tracing::debug!(tab_id = %id, ?event, "Ignoring event for closed tab");
            return Ok(DispatchOutcome::Ignored);
        }

        match event {
            EngineEvent::LoadStarted => self.on_load_started(id)?,
            EngineEvent::LoadFinished => self.on_navigation_finished(id)?,
            EngineEvent::UrlChanged(url) => {
                self.on_url_changed(id, &url)?;
            }
            EngineEvent::TitleChanged => self.on_title_changed(id)?,
            EngineEvent::CloseRequested => return Ok(self.close_tab(TabTarget::Id(id))?.into()),
        }

        Ok(DispatchOutcome::Handled)
    }

    fn dispatch_toolbar(&mut self, id: TabId, action: NavAction) -> Result<DispatchOutcome> {
        self.ensure_running()?;

        match action {
            NavAction::Back => self.back(id)?,
            NavAction::Forward => self.forward(id)?,
            NavAction::Reload => self.reload(id)?,
            NavAction::Submit(text) => {
                self.submit_url_bar(id, &text)?;
            }
            NavAction::Bookmark => {
                self.add_bookmark(id)?;
            }
            NavAction::ShowHistory => return Ok(DispatchOutcome::ShowHistory(self.history_dialog())),
        }

        Ok(DispatchOutcome::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use tabshell_storage::{HistoryPersistence, StoragePaths};
    use tabshell_tabs::fake::{EngineCall, FakeEngine};

    const NEW_TAB: &str = "file:///data/pages/newtab.html";

    fn paths(root: &Path) -> StoragePaths {
        StoragePaths {
            bookmarks: root.join("user/bookmarks.json"),
            history: root.join("user/history.json"),
            renames: root.join("pages/renames.json"),
        }
    }

    fn manager_in(root: &Path) -> (FakeEngine, SessionManager<FakeEngine>) {
        let engine = FakeEngine::new();
        let storage = Storage::open(&paths(root), HistoryPersistence::SessionOnly);
        let manager = SessionManager::new(engine.clone(), storage, NEW_TAB);
        (engine, manager)
    }

    fn write_renames(root: &Path, json: &str) {
        let path = paths(root).renames;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, json).unwrap();
    }

    #[test]
    fn test_open_tab_defaults_to_new_tab_page() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        let id = manager.open_new_tab().unwrap();
        let tab = manager.tab(id).unwrap();
        assert_eq!(tab.title(), "Home");
        assert_eq!(tab.state(), TabState::Loading);
        assert_eq!(engine.last_requested_url(id).as_deref(), Some(NEW_TAB));
        assert_eq!(manager.current_tab_id(), Some(id));
        assert!(engine.is_visible(id));
    }

    #[test]
    fn test_open_selects_new_and_hides_previous() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        let first = manager.open_new_tab().unwrap();
        let second = manager.open_tab(Some("https://example.com")).unwrap();

        assert_eq!(manager.current_index(), Some(1));
        assert!(!engine.is_visible(first));
        assert!(engine.is_visible(second));

        manager.select_tab(0).unwrap();
        assert!(engine.is_visible(first));
        assert!(!engine.is_visible(second));
    }

    #[test]
    fn test_tab_count_tracks_opens_minus_closes() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        // open, open, close, open, close, open, close, close ...
        let script = [true, true, false, true, false, true, false, false, true, false];
        let mut opens = 0usize;
        let mut closes = 0usize;

        for (step, open) in script.iter().enumerate() {
            if *open {
                manager.open_new_tab().unwrap();
                opens += 1;
            } else {
                // Alternate closing by index and by handle
                let target = if step % 2 == 0 {
                    TabTarget::Index(0)
                } else {
                    TabTarget::Id(manager.tab_at(manager.tab_count() - 1).unwrap().id())
                };
                let outcome = manager.close_tab(target).unwrap();
                closes += 1;

                if opens == closes {
                    assert_eq!(outcome, CloseOutcome::LastTabClosed);
                    assert!(manager.is_shut_down());
                    break;
                }
                assert_eq!(outcome, CloseOutcome::Closed { remaining: opens - closes });
            }
            assert_eq!(manager.tab_count(), opens - closes);
            assert!(!manager.is_shut_down());
        }

        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn test_closing_only_tab_shuts_down_once() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        let id = manager.open_new_tab().unwrap();
        let outcome = manager
            .dispatch(ShellEvent::Engine {
                tab: id,
                event: EngineEvent::CloseRequested,
            })
            .unwrap();
        assert!(matches!(outcome, DispatchOutcome::Shutdown));
        assert!(engine.is_released(id));

        // No second shutdown, no further work
        assert!(matches!(
            manager.dispatch(ShellEvent::CloseTab(TabTarget::Index(0))),
            Err(SessionError::ShutDown)
        ));
        assert!(matches!(manager.open_new_tab(), Err(SessionError::ShutDown)));
        assert!(matches!(
            manager
                .dispatch(ShellEvent::Engine {
                    tab: id,
                    event: EngineEvent::CloseRequested,
                })
                .unwrap(),
            DispatchOutcome::Ignored
        ));
    }

    #[test]
    fn test_close_current_selects_right_neighbour() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        let a = manager.open_new_tab().unwrap();
        let b = manager.open_new_tab().unwrap();
        let c = manager.open_new_tab().unwrap();

        manager.select_tab(1).unwrap();
        manager.close_tab(TabTarget::Id(b)).unwrap();
        assert_eq!(manager.current_tab_id(), Some(c));
        assert!(engine.is_visible(c));

        manager.close_tab(TabTarget::Id(c)).unwrap();
        assert_eq!(manager.current_tab_id(), Some(a));
        assert!(engine.is_visible(a));
    }

    #[test]
    fn test_close_before_current_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, mut manager) = manager_in(dir.path());

        let _a = manager.open_new_tab().unwrap();
        let b = manager.open_new_tab().unwrap();
        manager.close_tab(TabTarget::Index(0)).unwrap();
        assert_eq!(manager.current_tab_id(), Some(b));
        assert_eq!(manager.current_index(), Some(0));
    }

    #[test]
    fn test_repeated_close_by_id_leaves_other_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        let a = manager.open_new_tab().unwrap();
        let b = manager.open_new_tab().unwrap();

        // Second click lands before the strip redraws
        assert!(matches!(
            manager.dispatch(ShellEvent::CloseTab(TabTarget::Id(a))).unwrap(),
            DispatchOutcome::TabClosed { remaining: 1 }
        ));
        assert!(matches!(
            manager.dispatch(ShellEvent::CloseTab(TabTarget::Id(a))),
            Err(SessionError::TabNotFound(_))
        ));

        assert!(!manager.is_shut_down());
        assert_eq!(manager.tab_count(), 1);
        assert_eq!(manager.current_tab_id(), Some(b));
        assert!(!engine.is_released(b));
    }

    #[test]
    fn test_select_by_id_follows_the_tab() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());

        let a = manager.open_new_tab().unwrap();
        let b = manager.open_new_tab().unwrap();
        let c = manager.open_new_tab().unwrap();
        manager.close_tab(TabTarget::Id(a)).unwrap();

        manager.dispatch(ShellEvent::SelectTab(TabTarget::Id(b))).unwrap();
        assert_eq!(manager.current_tab_id(), Some(b));
        assert!(engine.is_visible(b));
        assert!(!engine.is_visible(c));

        assert!(matches!(
            manager.dispatch(ShellEvent::SelectTab(TabTarget::Id(a))),
            Err(SessionError::TabNotFound(_))
        ));
        assert_eq!(manager.current_tab_id(), Some(b));
    }

    #[test]
    fn test_close_unknown_targets() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, mut manager) = manager_in(dir.path());
        manager.open_new_tab().unwrap();

        assert!(matches!(
            manager.close_tab(TabTarget::Index(3)),
            Err(SessionError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            manager.close_tab(TabTarget::Id(TabId::new())),
            Err(SessionError::TabNotFound(_))
        ));
        assert_eq!(manager.tab_count(), 1);
    }

    #[test]
    fn test_rename_submit_then_url_change_shows_friendly_name() {
        let dir = tempfile::tempdir().unwrap();
        write_renames(dir.path(), r#"{"Search": "https://example.com/search"}"#);
        let (engine, mut manager) = manager_in(dir.path());
        let id = manager.open_new_tab().unwrap();

        manager
            .dispatch(ShellEvent::Toolbar {
                tab: id,
                action: NavAction::Submit("Search".to_string()),
            })
            .unwrap();
        assert_eq!(
            engine.last_requested_url(id).as_deref(),
            Some("https://example.com/search")
        );

        engine.set_url(id, "https://example.com/search");
        manager
            .dispatch(ShellEvent::Engine {
                tab: id,
                event: EngineEvent::UrlChanged("https://example.com/search".to_string()),
            })
            .unwrap();
        assert_eq!(manager.tab(id).unwrap().url_bar_text(), "Search");
        assert_eq!(manager.history().last().unwrap().url, "Search");

        engine.set_title(id, "Example Search");
        manager
            .dispatch(ShellEvent::Engine {
                tab: id,
                event: EngineEvent::LoadFinished,
            })
            .unwrap();
        let tab = manager.tab(id).unwrap();
        assert_eq!(tab.title(), "Example Search");
        assert_eq!(tab.url_bar_text(), "Search");
        assert_eq!(tab.state(), TabState::Loaded);
    }

    #[test]
    fn test_late_title_relabels_without_state_change() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());
        let id = manager.open_new_tab().unwrap();

        manager.on_navigation_finished(id).unwrap();
        assert_eq!(manager.tab(id).unwrap().title(), "Home");

        engine.set_title(id, "Dashboard");
        manager
            .dispatch(ShellEvent::Engine {
                tab: id,
                event: EngineEvent::TitleChanged,
            })
            .unwrap();
        let tab = manager.tab(id).unwrap();
        assert_eq!(tab.title(), "Dashboard");
        assert_eq!(tab.state(), TabState::Loaded);
    }

    #[test]
    fn test_unmapped_submit_navigates_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());
        let id = manager.open_new_tab().unwrap();

        let target = manager.submit_url_bar(id, "https://rust-lang.org").unwrap();
        assert_eq!(target.as_deref(), Some("https://rust-lang.org"));
        assert_eq!(
            engine.calls(id).last(),
            Some(&EngineCall::Load("https://rust-lang.org".to_string()))
        );

        assert_eq!(manager.submit_url_bar(id, "  ").unwrap(), None);
    }

    #[test]
    fn test_url_change_appends_history_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, mut manager) = manager_in(dir.path());
        let id = manager.open_new_tab().unwrap();

        for url in ["https://a.example", "https://b.example", "https://a.example"] {
            manager.on_url_changed(id, url).unwrap();
        }

        let urls: Vec<&str> = manager.history().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example", "https://a.example"]);
        assert!(manager.history().iter().all(|e| e.title.is_empty()));

        let outcome = manager
            .dispatch(ShellEvent::Toolbar {
                tab: id,
                action: NavAction::ShowHistory,
            })
            .unwrap();
        let DispatchOutcome::ShowHistory(dialog) = outcome else {
            panic!("expected history dialog");
        };
        assert_eq!(dialog.items().len(), 3);
    }

    #[test]
    fn test_bookmark_saves_engine_url() {
        let dir = tempfile::tempdir().unwrap();
        write_renames(dir.path(), r#"{"Search": "https://example.com/search"}"#);
        let (engine, mut manager) = manager_in(dir.path());
        let id = manager.open_new_tab().unwrap();
        engine.set_url(id, "https://example.com/search");

        manager
            .dispatch(ShellEvent::Toolbar {
                tab: id,
                action: NavAction::Bookmark,
            })
            .unwrap();

        let written: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("user/bookmarks.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            written,
            serde_json::json!([{ "url": "https://example.com/search", "title": "" }])
        );
        assert_eq!(manager.bookmarks().len(), 1);
    }

    #[test]
    fn test_toolbar_buttons_reach_engine() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());
        let id = manager.open_new_tab().unwrap();

        for action in [NavAction::Back, NavAction::Forward, NavAction::Reload] {
            manager
                .dispatch(ShellEvent::Toolbar { tab: id, action })
                .unwrap();
        }

        let calls = engine.calls(id);
        assert_eq!(
            &calls[calls.len() - 3..],
            &[EngineCall::Back, EngineCall::Forward, EngineCall::Reload]
        );
    }

    #[test]
    fn test_stale_engine_events_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, mut manager) = manager_in(dir.path());
        let keep = manager.open_new_tab().unwrap();
        let gone = manager.open_new_tab().unwrap();
        manager.close_tab(TabTarget::Id(gone)).unwrap();

        for event in [
            EngineEvent::LoadStarted,
            EngineEvent::LoadFinished,
            EngineEvent::UrlChanged("https://late.example".to_string()),
            EngineEvent::TitleChanged,
            EngineEvent::CloseRequested,
        ] {
            let outcome = manager
                .dispatch(ShellEvent::Engine { tab: gone, event })
                .unwrap();
            assert!(matches!(outcome, DispatchOutcome::Ignored));
        }

        assert_eq!(manager.tab_count(), 1);
        assert!(manager.history().is_empty());
        assert_eq!(manager.current_tab_id(), Some(keep));
    }

    #[test]
    fn test_engine_rejecting_url_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut manager) = manager_in(dir.path());
        manager.open_new_tab().unwrap();
        engine.reject_urls_starting_with("bogus:");

        assert!(matches!(
            manager.open_tab(Some("bogus:thing")),
            Err(SessionError::Tab(TabError::Engine(_)))
        ));
        assert_eq!(manager.tab_count(), 1);
    }

    #[test]
    fn test_toolbar_for_unknown_tab_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, mut manager) = manager_in(dir.path());
        manager.open_new_tab().unwrap();

        assert!(matches!(
            manager.dispatch(ShellEvent::Toolbar {
                tab: TabId::new(),
                action: NavAction::Reload,
            }),
            Err(SessionError::TabNotFound(_))
        ));
    }

    #[test]
    fn test_snapshots_follow_strip_order() {
        let dir = tempfile::tempdir().unwrap();
        let (_engine, mut manager) = manager_in(dir.path());
        let a = manager.open_new_tab().unwrap();
        let b = manager.open_tab(Some("https://b.example")).unwrap();

        let snapshots = manager.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!((snapshots[0].id, snapshots[0].index), (a, 0));
        assert_eq!((snapshots[1].id, snapshots[1].index), (b, 1));
        assert!(!snapshots[0].is_current);
        assert!(snapshots[1].is_current);
        assert_eq!(snapshots[1].title, "Home");
    }

    #[test]
    fn test_last_close_writes_pending_history() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FakeEngine::new();
        let storage = Storage::open(&paths(dir.path()), HistoryPersistence::Disk);
        let mut manager = SessionManager::new(engine, storage, NEW_TAB);

        let id = manager.open_new_tab().unwrap();
        manager.on_url_changed(id, "https://a.example").unwrap();
        manager.on_url_changed(id, "https://b.example").unwrap();
        manager.close_tab(TabTarget::Id(id)).unwrap();

        let saved: Vec<HistoryEntry> =
            serde_json::from_str(&fs::read_to_string(paths(dir.path()).history).unwrap()).unwrap();
        let urls: Vec<&str> = saved.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }
}
