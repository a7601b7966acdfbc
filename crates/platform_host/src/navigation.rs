//! Navigation contracts consumed by the desktop route bridge.

use std::{cell::RefCell, rc::Rc};

/// Narrow view of the application's navigation system.
pub trait Navigator {
    /// Returns the current location path (without origin).
    fn current_path(&self) -> String;

    /// Navigates to `path`, adding a history entry.
    fn navigate_to(&self, path: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// Navigator that stays on `/` and ignores navigation requests.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_path(&self) -> String {
        "/".to_string()
    }

    fn navigate_to(&self, _path: &str) {}
}

#[derive(Debug, Clone)]
/// In-memory navigator recording every navigation. Clones share history.
pub struct MemoryNavigator {
    history: Rc<RefCell<Vec<String>>>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::starting_at("/")
    }
}

impl MemoryNavigator {
    /// Creates a navigator whose current path is `path`.
    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            history: Rc::new(RefCell::new(vec![path.into()])),
        }
    }

    /// Returns every path visited, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate_to(&self, path: &str) {
        self.history.borrow_mut().push(path.to_string());
    }
}
