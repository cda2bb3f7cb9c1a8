//! Application state container
//!
//! Owns the configuration and the session manager. The GUI shell holds one of
//! these and feeds it [`ShellEvent`]s.

use std::fs;

use tabshell_session::{DispatchOutcome, SessionManager, ShellEvent};
use tabshell_storage::Storage;
use tabshell_tabs::{EngineFactory, TabId};

use crate::config::Config;
use crate::Result;

const NEW_TAB_PAGE: &str = include_str!("../assets/newtab.html");

pub struct Browser<F: EngineFactory> {
    config: Config,
    session: SessionManager<F>,
}

impl<F: EngineFactory> Browser<F> {
    /// Prepare the data directory, open storage and show the first tab.
    pub fn new(config: Config, engine: F) -> Result<Self> {
        fs::create_dir_all(config.user_dir())?;
        fs::create_dir_all(config.pages_dir())?;

        if !config.new_tab_page.exists() {
            fs::write(&config.new_tab_page, NEW_TAB_PAGE)?;
            tracing::info!(path = %config.new_tab_page.display(), "Seeded new-tab page");
        }

        let storage = Storage::open(&config.storage_paths(), config.history_persistence());
        let mut session = SessionManager::new(engine, storage, config.new_tab_url()?);
        let first = session.open_new_tab()?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            tab_id = %first,
            "Browser initialized"
        );

        Ok(Self {
            config,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionManager<F> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager<F> {
        &mut self.session
    }

    pub fn current_tab_id(&self) -> Option<TabId> {
        self.session.current_tab_id()
    }

    pub fn dispatch(&mut self, event: ShellEvent) -> Result<DispatchOutcome> {
        Ok(self.session.dispatch(event)?)
    }
}
