//! Tab strip commands
use serde::Serialize;
use tauri::{AppHandle, Manager};

use tabshell_core::{ShellEvent, TabId, TabSnapshot, TabTarget};

use super::queue;
use crate::pump::PumpMessage;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[tauri::command]
pub async fn get_tabs(app: AppHandle) -> CommandResult<Vec<TabSnapshot>> {
    let Some(state) = app.try_state::<AppState>() else {
        return CommandResult::err("AppState not found".to_string());
    };

    match state.with_browser(|browser| Ok(browser.session().snapshots())) {
        Ok(tabs) => CommandResult::ok(tabs),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

#[tauri::command]
pub async fn new_tab(app: AppHandle) -> CommandResult<()> {
    queue(&app, PumpMessage::Dispatch(ShellEvent::NewTab))
}

#[tauri::command]
pub async fn open_url_in_new_tab(app: AppHandle, url: String) -> CommandResult<()> {
    queue(&app, PumpMessage::Dispatch(ShellEvent::OpenUrl(url)))
}

#[tauri::command]
pub async fn select_tab(app: AppHandle, tab_id: TabId) -> CommandResult<()> {
    queue(
        &app,
        PumpMessage::Dispatch(ShellEvent::SelectTab(TabTarget::Id(tab_id))),
    )
}

#[tauri::command]
pub async fn close_tab(app: AppHandle, tab_id: TabId) -> CommandResult<()> {
    queue(
        &app,
        PumpMessage::Dispatch(ShellEvent::CloseTab(TabTarget::Id(tab_id))),
    )
}
