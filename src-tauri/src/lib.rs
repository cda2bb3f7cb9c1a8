//! TabShell - Tauri Application
//!
//! The main window hosts one chrome webview (tab strip and navigation bar)
//! plus one child webview per tab. All browser state lives in
//! `tabshell-core`; this crate only turns clicks and webview callbacks into
//! events.

mod commands;
mod engine;
mod pump;
mod state;

use engine::{ContentBounds, TauriEngine};
use state::AppState;
use tabshell_core::{Browser, Config, EngineSettings};
use tauri::webview::WebviewBuilder;
use tauri::window::WindowBuilder;
use tauri::{LogicalPosition, LogicalSize, Manager, WebviewUrl};

const MAIN_WINDOW_LABEL: &str = "main";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Rendering backend must be chosen before any webview starts
    let engine_settings = EngineSettings::default();
    engine_settings.apply_process_env();

    // Initialize logging
    tabshell_core::init_logging();

    tauri::Builder::default()
        .setup(move |app| {
            let config = Config::default();
            let geometry = config.settings.window.clone();
            let (width, height) = (f64::from(geometry.width), f64::from(geometry.height));

            let window = WindowBuilder::new(app, MAIN_WINDOW_LABEL)
                .title(&geometry.title)
                .inner_size(width, height)
                .position(f64::from(geometry.x), f64::from(geometry.y))
                .build()?;

            let ui_webview = WebviewBuilder::new(
                commands::ui_webview_label(MAIN_WINDOW_LABEL),
                WebviewUrl::App("index.html".into()),
            )
            .auto_resize();

            let ui_webview = window.add_child(
                ui_webview,
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(width, height),
            )?;
            let _ = ui_webview.show();

            let (events, queue) = tokio::sync::mpsc::unbounded_channel();
            let engine = TauriEngine::new(
                app.handle().clone(),
                MAIN_WINDOW_LABEL,
                events.clone(),
                ContentBounds::below_chrome(width, height),
                &engine_settings,
            );

            let browser = Browser::new(config, engine)?;
            app.manage(AppState::new(browser, events));

            pump::spawn(app.handle().clone(), MAIN_WINDOW_LABEL.to_string(), queue)?;

            tracing::info!("TabShell started");

            Ok(())
        })
        .on_window_event(|window, event| {
            // Dialog closed from its title bar
            if window.label() == pump::HISTORY_WINDOW_LABEL
                && matches!(event, tauri::WindowEvent::Destroyed)
            {
                if let Some(state) = window.try_state::<AppState>() {
                    *state.history_dialog_slot() = None;
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            // Tab commands
            commands::tabs::get_tabs,
            commands::tabs::new_tab,
            commands::tabs::open_url_in_new_tab,
            commands::tabs::select_tab,
            commands::tabs::close_tab,
            // Navigation commands
            commands::navigation::toolbar,
            // Bookmark commands
            commands::bookmarks::get_bookmarks,
            // History dialog commands
            commands::history::get_history_dialog,
            commands::history::select_history_entry,
            commands::history::load_history_selection,
            commands::history::close_history_dialog,
        ])
        .build(tauri::generate_context!())
        .expect("error while building TabShell")
        .run(|app, event| {
            if let tauri::RunEvent::Exit = event {
                if let Some(state) = app.try_state::<AppState>() {
                    state.flush_history();
                }
            }
        });
}
