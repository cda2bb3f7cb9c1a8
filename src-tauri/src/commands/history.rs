//! History dialog commands
use tauri::{AppHandle, Manager};

use tabshell_core::HistoryDialog;

use super::queue;
use super::tabs::CommandResult;
use crate::pump::{close_history_window, PumpMessage};
use crate::state::AppState;

#[tauri::command]
pub async fn get_history_dialog(app: AppHandle) -> CommandResult<Option<HistoryDialog>> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(state.history_dialog()),
        None => CommandResult::err("AppState not found".to_string()),
    }
}

#[tauri::command]
pub async fn select_history_entry(app: AppHandle, index: usize) -> CommandResult<()> {
    let Some(state) = app.try_state::<AppState>() else {
        return CommandResult::err("AppState not found".to_string());
    };

    let mut slot = state.history_dialog_slot();
    let Some(dialog) = slot.as_mut() else {
        return CommandResult::err("History dialog is not open".to_string());
    };

    match dialog.select(index) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

#[tauri::command]
pub async fn load_history_selection(app: AppHandle) -> CommandResult<()> {
    queue(&app, PumpMessage::LoadHistorySelection)
}

#[tauri::command]
pub async fn close_history_dialog(app: AppHandle) -> CommandResult<()> {
    if let Some(state) = app.try_state::<AppState>() {
        *state.history_dialog_slot() = None;
    }

    close_history_window(&app);
    CommandResult::ok(())
}
