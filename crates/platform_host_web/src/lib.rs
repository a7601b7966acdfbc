//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Off the browser target every adapter degrades to the matching no-op behavior so the crate
//! still builds and tests natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Factories returning the adapters the desktop host should use on the active target.
pub mod adapters;
pub mod navigation;
pub mod storage;

pub use adapters::{key_value_store, navigator};
pub use navigation::BrowserNavigator;
pub use storage::local_storage::WebKeyValueStore;
