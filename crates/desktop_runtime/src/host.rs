//! Host-side execution of reducer effects and the boot hydration sequence.
//!
//! The host owns the platform services (key-value storage, navigation) and keeps them out of the
//! reducer. It is framework-agnostic: the leptos layer drives it with `spawn_local`, tests with
//! `futures::executor::block_on`.

use std::{cell::RefCell, rc::Rc};

use leptos::logging;
use platform_host::{KeyValueStore, Navigator};

use crate::{
    config::DesktopConfig,
    controller::WindowController,
    model::WindowRecord,
    persistence::WindowLayoutStore,
    reducer::RuntimeEffect,
};

#[derive(Clone)]
/// Platform services used to carry out [`RuntimeEffect`] values.
pub struct DesktopHost {
    store: Rc<dyn KeyValueStore>,
    navigator: Rc<dyn Navigator>,
}

impl DesktopHost {
    pub fn new(store: Rc<dyn KeyValueStore>, navigator: Rc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn store(&self) -> Rc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub fn navigator(&self) -> Rc<dyn Navigator> {
        self.navigator.clone()
    }

    /// Layout store bound to the key selected by `config`.
    pub fn layout_store(&self, config: &DesktopConfig) -> WindowLayoutStore {
        WindowLayoutStore::new(self.store.clone(), config.layout_storage_key.clone())
    }

    pub async fn load_config(&self) -> DesktopConfig {
        DesktopConfig::load(self.store.as_ref()).await
    }

    /// Boot sequence: load config and the persisted layout, hydrate the controller, then execute
    /// the resulting effects (cleanup, persistence, any parked route).
    ///
    /// Windows opened before boot finishes are kept alongside the restored ones.
    pub async fn boot(&self, controller: &RefCell<WindowController>) {
        let config = self.load_config().await;
        let windows = self.layout_store(&config).load().await;
        {
            let mut controller = controller.borrow_mut();
            controller.set_config(config);
            controller.hydrate(windows);
        }
        self.flush(controller).await;
    }

    /// Drains queued controller effects and executes them.
    pub async fn flush(&self, controller: &RefCell<WindowController>) {
        let (effects, windows, config) = {
            let mut controller = controller.borrow_mut();
            let effects = controller.take_effects();
            (
                effects,
                controller.windows().to_vec(),
                controller.state().config.clone(),
            )
        };
        if effects.is_empty() {
            return;
        }
        self.run_effects(&config, &windows, effects).await;
    }

    /// Executes `effects` in order against a snapshot of the window list.
    ///
    /// Repeated `PersistLayout` requests in one batch collapse into a single write at the end.
    pub async fn run_effects(
        &self,
        config: &DesktopConfig,
        windows: &[WindowRecord],
        effects: Vec<RuntimeEffect>,
    ) {
        let layout = self.layout_store(config);
        let mut persist = false;
        for effect in effects {
            match effect {
                RuntimeEffect::PersistLayout => persist = true,
                RuntimeEffect::ForgetWindow(window_id) => layout.forget_window(&window_id).await,
                RuntimeEffect::CleanupPersisted(ids) => layout.cleanup(&ids).await,
                RuntimeEffect::Navigate(path) => self.navigate(&path),
            }
        }
        if persist {
            layout.save(windows).await;
        }
    }

    fn navigate(&self, path: &str) {
        if self.navigator.current_path() == path {
            return;
        }
        logging::log!("navigating to {path}");
        self.navigator.navigate_to(path);
    }
}
