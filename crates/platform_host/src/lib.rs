//! Typed host contracts shared by the desktop runtime and its browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the key-value storage
//! contract used for window layout persistence, the navigation contract consumed by the route
//! bridge, and time helpers. Concrete browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod navigation;
pub mod storage;
pub mod time;

pub use navigation::{MemoryNavigator, Navigator, NoopNavigator};
pub use storage::key_value::{
    load_json_with, save_json_with, KeyValueFuture, KeyValueStore, MemoryKeyValueStore,
    NoopKeyValueStore, UnavailableKeyValueStore,
};
pub use time::{next_stamp_ms_after, unix_time_ms_now};
