//! Event pump
//!
//! One thread drains the event queue and applies each message to the
//! browser in arrival order, so handlers never overlap.

use std::thread::JoinHandle;
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindowBuilder};
use tokio::sync::mpsc::UnboundedReceiver;

use tabshell_core::{DispatchOutcome, HistoryDialog, SessionError, ShellEvent};

use crate::commands::ui_webview_label;
use crate::state::AppState;

pub const HISTORY_WINDOW_LABEL: &str = "history";

#[derive(Debug)]
pub enum PumpMessage {
    Dispatch(ShellEvent),
    /// "Load" pressed in the history dialog
    LoadHistorySelection,
}

pub fn spawn(
    app: AppHandle,
    main_window: String,
    mut events: UnboundedReceiver<PumpMessage>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("tabshell-events".to_string())
        .spawn(move || {
            while let Some(message) = events.blocking_recv() {
                handle(&app, &main_window, message);
            }
            tracing::debug!("Event pump stopped");
        })
}

fn handle(app: &AppHandle, main_window: &str, message: PumpMessage) {
    let Some(state) = app.try_state::<AppState>() else {
        tracing::warn!("App state missing, dropping event");
        return;
    };

    match message {
        PumpMessage::Dispatch(event) => {
            match state.with_browser_mut(|browser| browser.dispatch(event)) {
                Ok(DispatchOutcome::Shutdown) => {
                    tracing::info!("Last tab closed, exiting");
                    app.exit(0);
                }
                Ok(DispatchOutcome::ShowHistory(dialog)) => show_history(app, &state, dialog),
                Ok(outcome) => {
                    if outcome.changes_tabs() {
                        notify_tabs_updated(app, main_window);
                    }
                }
                Err(tabshell_core::CoreError::Session(SessionError::ShutDown)) => {
                    tracing::debug!("Event after shutdown dropped");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Event failed");
                    notify_tabs_updated(app, main_window);
                }
            }
        }
        PumpMessage::LoadHistorySelection => {
            // Not held while the engine works; window events lock it on the main thread
            let Some(mut dialog) = state.history_dialog_slot().take() else {
                return;
            };

            match state.with_browser_mut(|browser| Ok(dialog.load_selected(browser.session_mut())?)) {
                Ok(Some(id)) => {
                    tracing::info!(tab_id = %id, "History entry opened");
                    notify_tabs_updated(app, main_window);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to open history entry"),
            }

            if !dialog.is_open() {
                close_history_window(app);
            } else if app.get_webview_window(HISTORY_WINDOW_LABEL).is_some() {
                state.history_dialog_slot().get_or_insert(dialog);
            }
        }
    }
}

fn notify_tabs_updated(app: &AppHandle, main_window: &str) {
    let _ = app.emit_to(ui_webview_label(main_window).as_str(), "tabs-updated", ());
}

fn show_history(app: &AppHandle, state: &AppState, dialog: HistoryDialog) {
    let entries = dialog.entries().len();
    *state.history_dialog_slot() = Some(dialog);

    if let Some(window) = app.get_webview_window(HISTORY_WINDOW_LABEL) {
        let _ = app.emit_to(HISTORY_WINDOW_LABEL, "history-updated", ());
        let _ = window.set_focus();
        return;
    }

    match WebviewWindowBuilder::new(
        app,
        HISTORY_WINDOW_LABEL,
        WebviewUrl::App("history.html".into()),
    )
    .title("History")
    .inner_size(400.0, 300.0)
    .position(100.0, 100.0)
    .build()
    {
        Ok(_) => tracing::info!(entries, "History dialog opened"),
        Err(e) => tracing::error!(error = %e, "Failed to open history dialog"),
    }
}

pub fn close_history_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(HISTORY_WINDOW_LABEL) {
        let _ = window.close();
    }
}
