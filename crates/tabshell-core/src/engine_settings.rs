//! Process-wide engine settings
//!
//! Fixed at launch. The rendering backend can only be chosen before the
//! engine starts, so [`EngineSettings::apply_process_env`] must run before
//! any webview exists.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub plugins: bool,
    pub javascript: bool,
    pub local_storage: bool,
    pub screen_capture: bool,
    pub webgl: bool,
    pub accelerated_2d_canvas: bool,
    /// Force software GL
    pub software_rendering: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            plugins: false,
            javascript: true,
            local_storage: true,
            screen_capture: false,
            webgl: true,
            accelerated_2d_canvas: true,
            software_rendering: true,
        }
    }
}

impl EngineSettings {
    /// Environment variable and value selecting the software rendering
    /// backend for this platform's webview, if it has one.
    pub fn rendering_override(&self) -> Option<(&'static str, &'static str)> {
        if !self.software_rendering {
            return None;
        }

        if cfg!(target_os = "windows") {
            Some(("WEBVIEW2_ADDITIONAL_BROWSER_ARGUMENTS", "--use-gl=swiftshader"))
        } else if cfg!(target_os = "linux") {
            Some(("LIBGL_ALWAYS_SOFTWARE", "1"))
        } else {
            None
        }
    }

    /// Set the rendering override in this process's environment.
    ///
    /// A value the user already exported wins.
    pub fn apply_process_env(&self) {
        let Some((key, value)) = self.rendering_override() else {
            return;
        };

        if std::env::var_os(key).is_some() {
            tracing::debug!(key, "Rendering override already set");
            return;
        }

        // Runs on the main thread before the engine or any worker starts
        std::env::set_var(key, value);
        tracing::info!(key, value, "Software rendering enabled");
    }

    /// Script injected into every page for capabilities the webview has no
    /// switch for.
    pub fn init_script(&self) -> String {
        let mut script = String::new();

        if !self.screen_capture {
            script.push_str(
                "if (navigator.mediaDevices) {\n\
                 \x20 navigator.mediaDevices.getDisplayMedia = () =>\n\
                 \x20   Promise.reject(new DOMException('Screen capture is disabled', 'NotAllowedError'));\n\
                 }\n",
            );
        }

        if !self.webgl {
            script.push_str(
                "(() => {\n\
                 \x20 const getContext = HTMLCanvasElement.prototype.getContext;\n\
                 \x20 HTMLCanvasElement.prototype.getContext = function (kind, ...rest) {\n\
                 \x20   if (kind === 'webgl' || kind === 'webgl2' || kind === 'experimental-webgl') return null;\n\
                 \x20   return getContext.call(this, kind, ...rest);\n\
                 \x20 };\n\
                 })();\n",
            );
        }

        if !self.local_storage {
            script.push_str(
                "try { Object.defineProperty(window, 'localStorage', { get: () => null }); } catch (_) {}\n",
            );
        }

        script
    }
}
