//! Child-webview engine
//!
//! Each tab is a child webview of the main window. Webview callbacks never
//! touch browser state: they are turned into [`ShellEvent`]s and queued for
//! the event pump.

use parking_lot::Mutex;
use std::sync::Arc;
use tauri::webview::{PageLoadEvent, WebviewBuilder};
use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, Webview, WebviewUrl};
use tokio::sync::mpsc::UnboundedSender;

use tabshell_core::{
    EngineError, EngineEvent, EngineFactory, EngineSettings, EngineView, ShellEvent, TabId,
};

use crate::pump::PumpMessage;

/// Scheme used by pages to ask for their tab to close.
const CLOSE_REQUEST_URL: &str = "tabshell://close-request";

const CLOSE_SENTINEL_SCRIPT: &str = r#"
(() => {
  try {
    window.close = () => { window.location.href = 'tabshell://close-request'; };
  } catch {}
})();
"#;

/// Where pages report same-document URL changes, with the new URL in `u`.
const URL_CHANGED_HOST: &str = "url-changed";

/// pushState, replaceState, back/forward within a document and fragment
/// jumps change the URL without a page load, so the page reports them.
const URL_CHANGE_SCRIPT: &str = r#"
(() => {
  let reported = location.href;
  const report = () => {
    if (location.href === reported) return;
    reported = location.href;
    window.location.href = 'tabshell://url-changed?u=' + encodeURIComponent(reported);
  };
  for (const name of ['pushState', 'replaceState']) {
    const original = history[name];
    history[name] = function (...args) {
      const result = original.apply(this, args);
      report();
      return result;
    };
  }
  window.addEventListener('popstate', report);
  window.addEventListener('hashchange', report);
})();
"#;

/// The URL carried by a same-document change report, or `None` for any
/// other navigation.
fn reported_url_change(url: &url::Url) -> Option<String> {
    if url.scheme() != "tabshell" || url.host_str() != Some(URL_CHANGED_HOST) {
        return None;
    }
    url.query_pairs()
        .find(|(key, _)| key == "u")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Height of the tab strip plus navigation bar drawn by the chrome webview.
pub const CHROME_HEIGHT: f64 = 76.0;

#[derive(Clone, Copy)]
pub struct ContentBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentBounds {
    /// Area below the chrome for a window of the given inner size.
    pub fn below_chrome(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: CHROME_HEIGHT,
            width,
            height: (height - CHROME_HEIGHT).max(0.0),
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    title: String,
}

pub struct TauriEngine {
    app: AppHandle,
    window_label: String,
    events: UnboundedSender<PumpMessage>,
    bounds: ContentBounds,
    init_script: String,
}

impl TauriEngine {
    pub fn new(
        app: AppHandle,
        window_label: impl Into<String>,
        events: UnboundedSender<PumpMessage>,
        bounds: ContentBounds,
        settings: &EngineSettings,
    ) -> Self {
        let mut init_script = settings.init_script();
        init_script.push_str(CLOSE_SENTINEL_SCRIPT);
        init_script.push_str(URL_CHANGE_SCRIPT);

        Self {
            app,
            window_label: window_label.into(),
            events,
            bounds,
            init_script,
        }
    }

    fn webview_label(&self, id: TabId) -> String {
        format!("content-{}-{}", self.window_label, id)
    }
}

fn send(events: &UnboundedSender<PumpMessage>, tab: TabId, event: EngineEvent) {
    if events
        .send(PumpMessage::Dispatch(ShellEvent::Engine { tab, event }))
        .is_err()
    {
        tracing::debug!(tab_id = %tab, "Event pump gone, dropping engine event");
    }
}

impl EngineFactory for TauriEngine {
    type View = TauriEngineView;

    fn create(&mut self, id: TabId, url: &str) -> Result<TauriEngineView, EngineError> {
        let parsed: url::Url = url
            .parse()
            .map_err(|_| EngineError::InvalidUrl(url.to_string()))?;

        let window = self
            .app
            .get_window(&self.window_label)
            .ok_or_else(|| EngineError::Backend(format!("window not found: {}", self.window_label)))?;

        let label = self.webview_label(id);
        let page = Arc::new(Mutex::new(PageState {
            url: url.to_string(),
            title: String::new(),
        }));

        let events_for_navigation = self.events.clone();
        let events_for_load = self.events.clone();
        let events_for_title = self.events.clone();
        let page_for_navigation = Arc::clone(&page);
        let page_for_load = Arc::clone(&page);
        let page_for_title = Arc::clone(&page);

        let builder = WebviewBuilder::new(&label, WebviewUrl::External(parsed))
            .transparent(false)
            .auto_resize()
            .initialization_script(self.init_script.as_str())
            .on_navigation(move |url| {
                if url.as_str().starts_with(CLOSE_REQUEST_URL) {
                    send(&events_for_navigation, id, EngineEvent::CloseRequested);
                    return false;
                }
                if url.scheme() == "tabshell" {
                    if let Some(changed) = reported_url_change(url) {
                        page_for_navigation.lock().url = changed.clone();
                        send(&events_for_navigation, id, EngineEvent::UrlChanged(changed));
                    }
                    return false;
                }
                true
            })
            .on_page_load(move |_webview, payload| match payload.event() {
                PageLoadEvent::Started => {
                    let url = payload.url().to_string();
                    page_for_load.lock().url = url.clone();
                    send(&events_for_load, id, EngineEvent::LoadStarted);
                    send(&events_for_load, id, EngineEvent::UrlChanged(url));
                }
                PageLoadEvent::Finished => {
                    page_for_load.lock().url = payload.url().to_string();
                    send(&events_for_load, id, EngineEvent::LoadFinished);
                }
            })
            .on_document_title_changed(move |_webview, title| {
                page_for_title.lock().title = title;
                send(&events_for_title, id, EngineEvent::TitleChanged);
            });

        let webview = window
            .add_child(
                builder,
                LogicalPosition::new(self.bounds.x, self.bounds.y),
                LogicalSize::new(self.bounds.width, self.bounds.height),
            )
            .map_err(|e| {
                tracing::error!(label = %label, tab_id = %id, error = %e, "Failed to create child webview");
                EngineError::Backend(e.to_string())
            })?;

        // Start hidden; the session shows the current tab
        let _ = webview.hide();

        tracing::info!(label = %label, tab_id = %id, url = %url, "Created child webview");

        Ok(TauriEngineView {
            id,
            label,
            app: self.app.clone(),
            page,
        })
    }
}

pub struct TauriEngineView {
    id: TabId,
    label: String,
    app: AppHandle,
    page: Arc<Mutex<PageState>>,
}

impl TauriEngineView {
    fn webview(&self) -> Result<Webview, EngineError> {
        self.app
            .get_webview(&self.label)
            .ok_or_else(|| EngineError::Backend(format!("webview not found: {}", self.label)))
    }

    fn eval(&self, script: &str) -> Result<(), EngineError> {
        self.webview()?
            .eval(script)
            .map_err(|e| EngineError::Backend(e.to_string()))
    }
}

impl EngineView for TauriEngineView {
    fn load(&mut self, url: &str) -> Result<(), EngineError> {
        let parsed: url::Url = url
            .parse()
            .map_err(|_| EngineError::InvalidUrl(url.to_string()))?;

        self.webview()?
            .navigate(parsed)
            .map_err(|e| EngineError::Backend(e.to_string()))?;
        tracing::debug!(label = %self.label, url = %url, "Navigated webview");
        Ok(())
    }

    fn back(&mut self) -> Result<(), EngineError> {
        self.eval("history.back()")
    }

    fn forward(&mut self) -> Result<(), EngineError> {
        self.eval("history.forward()")
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        self.eval("location.reload()")
    }

    fn url(&self) -> String {
        self.page.lock().url.clone()
    }

    fn title(&self) -> String {
        self.page.lock().title.clone()
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), EngineError> {
        let webview = self.webview()?;
        let result = if visible { webview.show() } else { webview.hide() };
        result.map_err(|e| EngineError::Backend(e.to_string()))
    }

    fn release(&mut self) -> Result<(), EngineError> {
        let Some(webview) = self.app.get_webview(&self.label) else {
            // Already gone with its window
            return Ok(());
        };

        webview
            .close()
            .map_err(|e| EngineError::Backend(e.to_string()))?;
        tracing::info!(label = %self.label, tab_id = %self.id, "Closed webview");
        Ok(())
    }
}
