//! Reactive runtime handle wiring the window controller, host, and UI services into leptos.
//!
//! [`DesktopRuntime`] is constructed explicitly by the entry layer and handed to
//! [`crate::components::DesktopShell`] as a prop. It owns the long-lived controller and dialog
//! service, mirrors their state into signals, and runs host effects with `spawn_local`.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
    time::Duration,
};

use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::*;

use crate::{
    context_menu::{ContextMenuState, MenuAction, MenuContext},
    controller::WindowController,
    dialogs::{DialogResponse, DialogService, InputDialogRequest, MessageBoxRequest},
    frame::ContentRegistry,
    host::DesktopHost,
    layout::effective_desktop,
    model::{DesktopState, InteractionState, Position, Size, WindowRecord},
    notifications::{NotificationId, NotificationTray, TrayEffect},
    reducer::{DesktopAction, OpenWindowRequest},
};

#[derive(Clone, Copy)]
/// Copyable handle for reading desktop state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntime {
    controller: StoredValue<Rc<RefCell<WindowController>>>,
    host: StoredValue<DesktopHost>,
    changed: StoredValue<Rc<Cell<bool>>>,
    dialogs: StoredValue<Rc<RefCell<DialogService>>>,
    dialogs_changed: Trigger,
    tray_timers: StoredValue<BTreeMap<NotificationId, TimeoutHandle>>,
    content: StoredValue<ContentRegistry<View>>,
    /// Reactive mirror of the controller state.
    pub state: RwSignal<DesktopState>,
    /// Reactive mirror of in-flight drag/resize gestures.
    pub interaction: RwSignal<InteractionState>,
    pub menu: RwSignal<ContextMenuState>,
    pub tray: RwSignal<NotificationTray>,
}

impl DesktopRuntime {
    /// Creates the runtime and starts boot hydration.
    ///
    /// Must run inside a reactive owner (usually the entry component).
    pub fn new(host: DesktopHost, content: ContentRegistry<View>) -> Self {
        let changed = Rc::new(Cell::new(false));
        let mut controller = WindowController::default();
        {
            let changed = changed.clone();
            controller.subscribe(move |_| changed.set(true));
        }
        let initial = controller.state().clone();

        let runtime = Self {
            controller: store_value(Rc::new(RefCell::new(controller))),
            host: store_value(host),
            changed: store_value(changed),
            dialogs: store_value(Rc::new(RefCell::new(DialogService::default()))),
            dialogs_changed: create_trigger(),
            tray_timers: store_value(BTreeMap::new()),
            content: store_value(content),
            state: create_rw_signal(initial),
            interaction: create_rw_signal(InteractionState::default()),
            menu: create_rw_signal(ContextMenuState::default()),
            tray: create_rw_signal(NotificationTray::default()),
        };
        runtime.boot();
        runtime
    }

    fn boot(self) {
        let controller = self.controller.get_value();
        let host = self.host.get_value();
        spawn_local(async move {
            host.boot(&controller).await;
            self.sync();
            let auto_close_ms = controller.borrow().state().config.notification_auto_close_ms;
            self.tray.update(|tray| {
                tray.set_auto_close_after(Duration::from_millis(auto_close_ms))
            });
        });
    }

    /// Applies `action` through the controller and schedules its effects.
    pub fn dispatch_action(&self, action: DesktopAction) -> bool {
        let controller = self.controller.get_value();
        let applied = controller.borrow_mut().dispatch(action);
        self.sync();
        self.flush_effects();
        applied
    }

    /// Copies controller state into the signals after the controller borrow is released.
    fn sync(&self) {
        let controller = self.controller.get_value();
        let (state, interaction) = {
            let controller = controller.borrow();
            let state = self
                .changed
                .get_value()
                .replace(false)
                .then(|| controller.state().clone());
            let interaction = self
                .interaction
                .with_untracked(|current| current != controller.interaction())
                .then(|| controller.interaction().clone());
            (state, interaction)
        };
        if let Some(state) = state {
            self.state.set(state);
        }
        if let Some(interaction) = interaction {
            self.interaction.set(interaction);
        }
    }

    fn flush_effects(&self) {
        let controller = self.controller.get_value();
        if !controller.borrow().has_pending_effects() {
            return;
        }
        let host = self.host.get_value();
        spawn_local(async move {
            host.flush(&controller).await;
        });
    }

    pub fn open_window(
        &self,
        window_id: &str,
        component: &str,
        title: &str,
        update_navigation: bool,
    ) -> bool {
        let mut request = OpenWindowRequest::new(window_id, component, title);
        request.update_navigation = update_navigation;
        self.dispatch_action(DesktopAction::OpenWindow(request))
    }

    pub fn navigation_changed(&self, path: impl Into<String>) {
        self.dispatch_action(DesktopAction::NavigationChanged { path: path.into() });
    }

    pub fn set_desktop_size(&self, size: Size) {
        if self.state.with_untracked(|state| state.desktop != size) {
            self.dispatch_action(DesktopAction::SetDesktopSize { size });
        }
    }

    /// Content view for a window, or `None` when its component is not registered.
    pub fn render_content(&self, window: &WindowRecord) -> Option<View> {
        self.content.with_value(|registry| registry.render(window))
    }

    /// Registers a content factory after construction, for views that need the runtime handle.
    pub fn register_content(
        &self,
        component: impl Into<String>,
        factory: impl Fn(&WindowRecord) -> View + 'static,
    ) {
        self.content
            .update_value(|registry| registry.register(component, factory));
    }

    pub fn open_menu(&self, context: MenuContext, pointer: Position) {
        let viewport = viewport_size().unwrap_or_else(|| {
            self.state.with_untracked(|state| effective_desktop(state.desktop, &state.config))
        });
        let state = self.state.get_untracked();
        self.menu
            .update(|menu| menu.open(context, pointer, viewport, &state));
    }

    pub fn close_menu(&self) {
        if self.menu.with_untracked(ContextMenuState::is_open) {
            self.menu.update(ContextMenuState::close);
        }
    }

    /// Executes a menu outcome. Collaborator commands are handed back to the caller.
    pub fn run_menu_action(&self, action: MenuAction) -> Option<String> {
        match action {
            MenuAction::Desktop(action) => {
                self.dispatch_action(action);
                None
            }
            MenuAction::Command(command) => Some(command),
        }
    }

    pub fn show_message_box(&self, request: MessageBoxRequest) -> DialogResponse {
        self.update_dialogs(|dialogs| dialogs.show_message_box(request))
    }

    pub fn show_input_dialog(&self, request: InputDialogRequest) -> DialogResponse {
        self.update_dialogs(|dialogs| dialogs.show_input_dialog(request))
    }

    /// Reads dialog state and subscribes the caller to dialog changes.
    pub fn with_dialogs<R>(&self, f: impl FnOnce(&DialogService) -> R) -> R {
        self.dialogs_changed.track();
        let dialogs = self.dialogs.get_value();
        let dialogs = dialogs.borrow();
        f(&dialogs)
    }

    pub fn with_dialogs_untracked<R>(&self, f: impl FnOnce(&DialogService) -> R) -> R {
        let dialogs = self.dialogs.get_value();
        let dialogs = dialogs.borrow();
        f(&dialogs)
    }

    pub fn update_dialogs<R>(&self, f: impl FnOnce(&mut DialogService) -> R) -> R {
        let dialogs = self.dialogs.get_value();
        let result = f(&mut dialogs.borrow_mut());
        self.dialogs_changed.notify();
        result
    }

    /// Adds a tray notification and arms its auto-close timer.
    pub fn notify(&self, title: impl Into<String>, message: impl Into<String>, auto_close: bool) {
        let mut effects = Vec::new();
        let (title, message) = (title.into(), message.into());
        self.tray
            .update(|tray| effects = tray.notify(title, message, auto_close).1);
        self.run_tray_effects(effects);
    }

    pub fn update_tray(&self, f: impl FnOnce(&mut NotificationTray) -> Vec<TrayEffect>) {
        let mut effects = Vec::new();
        self.tray.update(|tray| effects = f(tray));
        self.run_tray_effects(effects);
    }

    fn run_tray_effects(&self, effects: Vec<TrayEffect>) {
        let runtime = *self;
        for effect in effects {
            match effect {
                TrayEffect::ScheduleAutoClose { id, token, after } => {
                    match set_timeout_with_handle(
                        move || runtime.tray_timer_elapsed(id, token),
                        after,
                    ) {
                        Ok(handle) => self.tray_timers.update_value(|timers| {
                            timers.insert(id, handle);
                        }),
                        Err(err) => logging::warn!("notification timer failed: {err:?}"),
                    }
                }
                TrayEffect::CancelAutoClose { id } => self.tray_timers.update_value(|timers| {
                    if let Some(handle) = timers.remove(&id) {
                        handle.clear();
                    }
                }),
            }
        }
    }

    fn tray_timer_elapsed(&self, id: NotificationId, token: u64) {
        self.tray_timers.update_value(|timers| {
            timers.remove(&id);
        });
        self.tray.update(|tray| {
            tray.auto_close_elapsed(id, token);
        });
    }
}

/// Browser viewport size, when running in a browser.
pub(crate) fn viewport_size() -> Option<Size> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Size::new(width as i32, height as i32))
}
