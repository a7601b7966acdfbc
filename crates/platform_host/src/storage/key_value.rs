//! Key-value storage contracts and in-process adapters.
//!
//! Values are JSON text stored per key. The runtime only relies on `get`, `set`, and `remove`, so
//! any durable client-side mechanism (browser `localStorage`, a desktop prefs file, IndexedDB)
//! can back it.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`KeyValueStore`] async methods.
pub type KeyValueFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for durable string values addressed by key.
pub trait KeyValueStore {
    /// Loads the raw value stored under `key`.
    fn get<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> KeyValueFuture<'a, Result<(), String>>;

    /// Removes `key`. Removing a missing key succeeds.
    fn remove<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets: reads are empty and writes succeed.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn get<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn set<'a>(&'a self, _key: &'a str, _value: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Store whose every operation fails, mirroring a browser with storage disabled or over quota.
pub struct UnavailableKeyValueStore;

impl KeyValueStore for UnavailableKeyValueStore {
    fn get<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Err("storage unavailable".to_string()) })
    }

    fn set<'a>(&'a self, _key: &'a str, _value: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Err("storage quota exceeded".to_string()) })
    }

    fn remove<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Err("storage unavailable".to_string()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same backing map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Returns every stored key in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Reads a value synchronously.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed JSON value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_json_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed JSON value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_json_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.set(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TrayPrefs {
        muted: bool,
    }

    #[test]
    fn memory_store_round_trip_and_remove() {
        let store = MemoryKeyValueStore::default();
        let store_obj: &dyn KeyValueStore = &store;

        block_on(store_obj.set("layout", "[]")).expect("set");
        assert_eq!(
            block_on(store_obj.get("layout")).expect("get"),
            Some("[]".to_string())
        );
        assert_eq!(store.keys(), vec!["layout".to_string()]);

        block_on(store_obj.remove("layout")).expect("remove");
        assert_eq!(block_on(store_obj.get("layout")).expect("get"), None);
        block_on(store_obj.remove("layout")).expect("removing a missing key succeeds");
    }

    #[test]
    fn memory_store_clones_share_backing_map() {
        let store = MemoryKeyValueStore::default();
        let alias = store.clone();
        block_on(alias.set("k", "1")).expect("set");
        assert_eq!(store.peek("k"), Some("1".to_string()));
    }

    #[test]
    fn typed_json_helpers_round_trip() {
        let store = MemoryKeyValueStore::default();
        block_on(save_json_with(&store, "tray", &TrayPrefs { muted: true })).expect("save");

        let loaded: Option<TrayPrefs> = block_on(load_json_with(&store, "tray")).expect("load");
        assert_eq!(loaded, Some(TrayPrefs { muted: true }));
    }

    #[test]
    fn typed_load_reports_malformed_json() {
        let store = MemoryKeyValueStore::default();
        block_on(store.set("tray", "{not json")).expect("set");
        let loaded: Result<Option<TrayPrefs>, String> = block_on(load_json_with(&store, "tray"));
        assert!(loaded.is_err());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopKeyValueStore;
        assert_eq!(block_on(store.get("k")).expect("get"), None);
        block_on(store.set("k", "{}")).expect("set");
        block_on(store.remove("k")).expect("remove");
    }

    #[test]
    fn unavailable_store_fails_every_operation() {
        let store = UnavailableKeyValueStore;
        assert!(block_on(store.get("k")).is_err());
        assert!(block_on(store.set("k", "{}")).is_err());
        assert!(block_on(store.remove("k")).is_err());
    }
}
