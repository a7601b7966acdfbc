//! History API navigator.

use platform_host::Navigator;

#[derive(Debug, Clone, Copy, Default)]
/// Navigator backed by `window.history`.
///
/// After `pushState` a synthetic `popstate` event is dispatched so client-side routers observe
/// the new location.
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.location().pathname().ok())
                .unwrap_or_else(|| "/".to_string())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            "/".to_string()
        }
    }

    fn navigate_to(&self, path: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(history) = window.history() else {
                return;
            };
            if history
                .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
                .is_err()
            {
                return;
            }
            if let Ok(event) = web_sys::Event::new("popstate") {
                let _ = window.dispatch_event(&event);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = path;
        }
    }
}
