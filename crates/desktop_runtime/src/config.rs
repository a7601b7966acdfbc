//! Runtime tunables for layout, persistence, and notifications.

use leptos::logging;
use platform_host::{load_json_with, KeyValueStore};
use serde::{Deserialize, Serialize};

use crate::model::{Position, Size};

/// Preference key holding an optional JSON [`DesktopConfig`] override.
pub const CONFIG_PREF_KEY: &str = "marketdesk.config.v1";
/// Storage key for the persisted open-window list.
pub const WINDOW_LAYOUT_KEY: &str = "marketdesk.windows.v1";

/// Window-manager configuration. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Position of the first cascaded window and of every wrap-around.
    pub cascade_origin: Position,
    /// Offset applied on both axes between consecutive new windows.
    pub cascade_step: i32,
    pub min_window_size: Size,
    /// Desktop size assumed by layout while the container is still unmeasured.
    pub fallback_desktop_size: Size,
    pub taskbar_height_px: i32,
    pub notification_auto_close_ms: u64,
    pub layout_storage_key: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            cascade_origin: Position::new(32, 32),
            cascade_step: 24,
            min_window_size: Size::new(220, 140),
            fallback_desktop_size: Size::new(1024, 730),
            taskbar_height_px: 38,
            notification_auto_close_ms: 5_000,
            layout_storage_key: WINDOW_LAYOUT_KEY.to_string(),
        }
    }
}

impl DesktopConfig {
    /// Loads the config override from `store`, falling back to defaults.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        match load_json_with::<_, DesktopConfig>(store, CONFIG_PREF_KEY).await {
            Ok(Some(config)) => config.sanitized(),
            Ok(None) => Self::default(),
            Err(err) => {
                logging::warn!("desktop config load failed, using defaults: {err}");
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.cascade_step <= 0 {
            self.cascade_step = defaults.cascade_step;
        }
        if self.cascade_origin.x < 0 || self.cascade_origin.y < 0 {
            self.cascade_origin = defaults.cascade_origin;
        }
        if !self.min_window_size.is_measured() {
            self.min_window_size = defaults.min_window_size;
        }
        if !self.fallback_desktop_size.is_measured() {
            self.fallback_desktop_size = defaults.fallback_desktop_size;
        }
        if self.layout_storage_key.trim().is_empty() {
            self.layout_storage_key = defaults.layout_storage_key;
        }
        self
    }
}
