use std::rc::Rc;

use platform_host::{KeyValueStore, Navigator};

use crate::{BrowserNavigator, WebKeyValueStore};

/// Returns the key-value store backing window persistence.
pub fn key_value_store() -> Rc<dyn KeyValueStore> {
    Rc::new(WebKeyValueStore)
}

/// Returns the navigator the route bridge drives.
pub fn navigator() -> Rc<dyn Navigator> {
    Rc::new(BrowserNavigator)
}
