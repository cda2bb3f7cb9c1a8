//! Navigation bar commands

use tauri::AppHandle;

use tabshell_core::{NavAction, ShellEvent, TabId};

use super::queue;
use super::tabs::CommandResult;
use crate::pump::PumpMessage;

/// One toolbar action for one tab: `{ tabId, action: { action, text? } }`.
#[tauri::command]
pub async fn toolbar(app: AppHandle, tab_id: TabId, action: NavAction) -> CommandResult<()> {
    tracing::debug!(tab_id = %tab_id, action = %action, "Toolbar action");
    queue(
        &app,
        PumpMessage::Dispatch(ShellEvent::Toolbar { tab: tab_id, action }),
    )
}
