//! Tauri IPC Commands
//!
//! Reads go straight to the browser state. Anything that changes it is
//! queued for the event pump, which emits `tabs-updated` once applied.

pub mod bookmarks;
pub mod history;
pub mod navigation;
pub mod tabs;

use tauri::{AppHandle, Manager};

use crate::pump::PumpMessage;
use crate::state::AppState;
use tabs::CommandResult;

pub fn ui_webview_label(window_label: &str) -> String {
    format!("ui-{window_label}")
}

fn queue(app: &AppHandle, message: PumpMessage) -> CommandResult<()> {
    let Some(state) = app.try_state::<AppState>() else {
        return CommandResult::err("AppState not found".to_string());
    };

    match state.queue(message) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
