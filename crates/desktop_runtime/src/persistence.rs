//! Window layout persistence over the host key-value store.
//!
//! The open-window list is stored as one JSON array under the configured layout key. Per-window
//! auxiliary records live under `<layout key>.window.<id>` and are tracked in an index key so
//! stale ones can be pruned through the narrow get/set/remove interface.

use std::rc::Rc;

use leptos::logging;
use platform_host::{load_json_with, save_json_with, KeyValueStore};
use serde_json::Value;

use crate::model::{WindowId, WindowRecord};

/// Serializes the window list as a JSON array of camelCase records.
pub fn encode_layout(windows: &[WindowRecord]) -> Result<String, String> {
    serde_json::to_string(windows).map_err(|e| e.to_string())
}

/// Parses a persisted window list, dropping anything that is not a usable record.
///
/// A document that is not a JSON array yields an empty list. Individual entries that fail to
/// deserialize, carry an empty id, a non-positive size, or repeat an earlier id are skipped.
pub fn decode_layout(raw: &str) -> Vec<WindowRecord> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            logging::warn!("persisted window layout is not a list; ignoring it");
            return Vec::new();
        }
        Err(err) => {
            logging::warn!("persisted window layout is not valid JSON: {err}");
            return Vec::new();
        }
    };

    let mut windows: Vec<WindowRecord> = Vec::with_capacity(entries.len());
    for entry in entries {
        let record = match serde_json::from_value::<WindowRecord>(entry) {
            Ok(record) => record,
            Err(err) => {
                logging::warn!("skipping malformed persisted window: {err}");
                continue;
            }
        };
        if record.id.as_str().trim().is_empty() || !record.size.is_measured() {
            logging::warn!("skipping persisted window `{}` with invalid identity or size", record.id);
            continue;
        }
        if windows.iter().any(|w| w.id == record.id) {
            logging::warn!("skipping duplicate persisted window `{}`", record.id);
            continue;
        }
        windows.push(record);
    }
    windows
}

/// Layout store bound to a key-value backend and a storage key.
#[derive(Clone)]
pub struct WindowLayoutStore {
    store: Rc<dyn KeyValueStore>,
    layout_key: String,
}

impl WindowLayoutStore {
    pub fn new(store: Rc<dyn KeyValueStore>, layout_key: impl Into<String>) -> Self {
        Self {
            store,
            layout_key: layout_key.into(),
        }
    }

    pub fn layout_key(&self) -> &str {
        &self.layout_key
    }

    fn window_state_key(&self, window_id: &WindowId) -> String {
        format!("{}.window.{}", self.layout_key, window_id)
    }

    fn index_key(&self) -> String {
        format!("{}.index", self.layout_key)
    }

    /// Writes the full window list. Failures are logged and otherwise ignored.
    pub async fn save(&self, windows: &[WindowRecord]) {
        let encoded = match encode_layout(windows) {
            Ok(encoded) => encoded,
            Err(err) => {
                logging::warn!("window layout encode failed: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.layout_key, &encoded).await {
            logging::warn!("window layout save failed: {err}");
        }
    }

    /// Reads the persisted window list; any failure yields an empty list.
    pub async fn load(&self) -> Vec<WindowRecord> {
        match self.store.get(&self.layout_key).await {
            Ok(Some(raw)) => decode_layout(&raw),
            Ok(None) => Vec::new(),
            Err(err) => {
                logging::warn!("window layout load failed: {err}");
                Vec::new()
            }
        }
    }

    /// Stores an opaque auxiliary record for `window_id`.
    pub async fn save_window_state(&self, window_id: &WindowId, value: &Value) {
        let key = self.window_state_key(window_id);
        if let Err(err) = save_json_with(self.store.as_ref(), &key, value).await {
            logging::warn!("window state save failed for `{window_id}`: {err}");
            return;
        }

        let mut index = self.load_index().await;
        if !index.contains(window_id) {
            index.push(window_id.clone());
            self.save_index(&index).await;
        }
    }

    pub async fn load_window_state(&self, window_id: &WindowId) -> Option<Value> {
        let key = self.window_state_key(window_id);
        match load_json_with::<_, Value>(self.store.as_ref(), &key).await {
            Ok(value) => value,
            Err(err) => {
                logging::warn!("window state load failed for `{window_id}`: {err}");
                None
            }
        }
    }

    /// Drops the auxiliary record of a closed window.
    pub async fn forget_window(&self, window_id: &WindowId) {
        self.remove_window_state(window_id).await;
        let mut index = self.load_index().await;
        let before = index.len();
        index.retain(|id| id != window_id);
        if index.len() != before {
            self.save_index(&index).await;
        }
    }

    /// Removes auxiliary records whose window is not in `current_ids`.
    pub async fn cleanup(&self, current_ids: &[WindowId]) {
        let index = self.load_index().await;
        let (keep, stale): (Vec<WindowId>, Vec<WindowId>) =
            index.into_iter().partition(|id| current_ids.contains(id));
        if stale.is_empty() {
            return;
        }
        for window_id in &stale {
            self.remove_window_state(window_id).await;
        }
        self.save_index(&keep).await;
        logging::log!("pruned {} stale window record(s)", stale.len());
    }

    async fn remove_window_state(&self, window_id: &WindowId) {
        let key = self.window_state_key(window_id);
        if let Err(err) = self.store.remove(&key).await {
            logging::warn!("window state removal failed for `{window_id}`: {err}");
        }
    }

    async fn load_index(&self) -> Vec<WindowId> {
        match load_json_with::<_, Vec<WindowId>>(self.store.as_ref(), &self.index_key()).await {
            Ok(index) => index.unwrap_or_default(),
            Err(err) => {
                logging::warn!("window state index load failed: {err}");
                Vec::new()
            }
        }
    }

    async fn save_index(&self, index: &[WindowId]) {
        if let Err(err) = save_json_with(self.store.as_ref(), &self.index_key(), &index).await {
            logging::warn!("window state index save failed: {err}");
        }
    }
}
