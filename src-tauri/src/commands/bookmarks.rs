//! Bookmark commands
use tauri::{AppHandle, Manager};

use tabshell_core::BookmarkEntry;

use super::tabs::CommandResult;
use crate::state::AppState;

#[tauri::command]
pub async fn get_bookmarks(app: AppHandle) -> CommandResult<Vec<BookmarkEntry>> {
    let Some(state) = app.try_state::<AppState>() else {
        return CommandResult::err("AppState not found".to_string());
    };

    match state.with_browser(|browser| Ok(browser.session().bookmarks().to_vec())) {
        Ok(bookmarks) => CommandResult::ok(bookmarks),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
