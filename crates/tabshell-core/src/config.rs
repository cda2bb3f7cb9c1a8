//! Shell configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tabshell_storage::{HistoryPersistence, StoragePaths};
use url::Url;

use crate::error::CoreError;
use crate::Result;

/// Main window placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Simple Browser".to_string(),
            x: 100,
            y: 100,
            width: 800,
            height: 600,
        }
    }
}

/// User-editable overlay read from `user/settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Write history to disk after every visit
    pub persist_history: bool,
    pub window: WindowSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            persist_history: true,
            window: WindowSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of all user data
    pub data_dir: PathBuf,
    pub bookmarks_path: PathBuf,
    pub history_path: PathBuf,
    pub renames_path: PathBuf,
    pub settings_path: PathBuf,
    /// Local page shown in new tabs
    pub new_tab_page: PathBuf,
    pub settings: Settings,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let user_dir = data_dir.join("user");
        let pages_dir = data_dir.join("pages");

        Self {
            bookmarks_path: user_dir.join("bookmarks.json"),
            history_path: user_dir.join("history.json"),
            settings_path: user_dir.join("settings.json"),
            renames_path: pages_dir.join("renames.json"),
            new_tab_page: pages_dir.join("newtab.html"),
            settings: Settings::default(),
            data_dir,
        }
    }

    /// Build the config for `data_dir` and apply `user/settings.json` on top.
    ///
    /// A missing settings file keeps the defaults; a malformed one is logged
    /// and ignored.
    pub fn load(data_dir: PathBuf) -> Self {
        let mut config = Self::new(data_dir);

        match std::fs::read_to_string(&config.settings_path) {
            Ok(text) => match serde_json::from_str::<Settings>(&text) {
                Ok(settings) => config.settings = settings,
                Err(e) => tracing::warn!(
                    path = %config.settings_path.display(),
                    error = %e,
                    "Ignoring malformed settings file"
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %config.settings_path.display(),
                error = %e,
                "Could not read settings file"
            ),
        }

        config
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("TabShell"))
            .unwrap_or_else(|| PathBuf::from("browserdata"))
    }

    pub fn user_dir(&self) -> PathBuf {
        self.data_dir.join("user")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.data_dir.join("pages")
    }

    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths {
            bookmarks: self.bookmarks_path.clone(),
            history: self.history_path.clone(),
            renames: self.renames_path.clone(),
        }
    }

    pub fn history_persistence(&self) -> HistoryPersistence {
        if self.settings.persist_history {
            HistoryPersistence::Disk
        } else {
            HistoryPersistence::SessionOnly
        }
    }

    /// `file://` URL of the new-tab page.
    pub fn new_tab_url(&self) -> Result<String> {
        let path = absolute(&self.new_tab_page)?;
        Url::from_file_path(&path)
            .map(String::from)
            .map_err(|()| CoreError::Config(format!("not a file path: {}", path.display())))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load(Self::data_dir())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

// Simple dirs implementation for the per-user data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
