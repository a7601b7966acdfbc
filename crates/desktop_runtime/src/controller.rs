//! Window controller: owns the authoritative desktop state and applies reducer actions to it.
//!
//! The controller is a plain store with no UI framework dependency. Every operation returns
//! immediately; the side effects it produces are queued for the host to drain with
//! [`WindowController::take_effects`]. Operations that cannot apply (unknown window, unmeasured
//! desktop) are logged and leave state untouched.

use leptos::logging;

use crate::{
    config::DesktopConfig,
    model::{DesktopState, InteractionState, Position, Size, WindowId, WindowRecord},
    reducer::{reduce_desktop, DesktopAction, OpenWindowRequest, RuntimeEffect},
};

/// Handle returned by [`WindowController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&DesktopState)>;

#[derive(Default)]
pub struct WindowController {
    state: DesktopState,
    interaction: InteractionState,
    pending_effects: Vec<RuntimeEffect>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl WindowController {
    pub fn new(config: DesktopConfig) -> Self {
        Self {
            state: DesktopState::with_config(config),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Open windows in creation order.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.state.windows
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn active_window(&self) -> Option<&WindowId> {
        self.state.active_window.as_ref()
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.hydrated
    }

    /// Applies `action`, committing the result only when the reducer accepts it.
    ///
    /// Returns whether the action was applied.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        let mut next_state = self.state.clone();
        let mut next_interaction = self.interaction.clone();
        match reduce_desktop(&mut next_state, &mut next_interaction, action) {
            Ok(effects) => {
                let changed = next_state != self.state;
                self.state = next_state;
                self.interaction = next_interaction;
                self.pending_effects.extend(effects);
                if changed {
                    self.notify();
                }
                true
            }
            Err(err) => {
                logging::warn!("desktop action ignored: {err}");
                false
            }
        }
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.pending_effects.is_empty()
    }

    /// Drains effects queued by applied actions, oldest first.
    pub fn take_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.pending_effects)
    }

    /// Registers a callback run after every state change.
    pub fn subscribe(&mut self, listener: impl Fn(&DesktopState) + 'static) -> ListenerId {
        self.next_listener_id += 1;
        let id = ListenerId(self.next_listener_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    /// Replaces the runtime configuration. Open windows keep their geometry.
    pub fn set_config(&mut self, config: DesktopConfig) {
        if self.state.config != config {
            self.state.config = config;
            self.notify();
        }
    }

    pub fn open(
        &mut self,
        window_id: impl Into<WindowId>,
        component: impl Into<String>,
        title: impl Into<String>,
        update_navigation: bool,
    ) -> bool {
        let mut request = OpenWindowRequest::new(window_id, component, title);
        request.update_navigation = update_navigation;
        self.dispatch(DesktopAction::OpenWindow(request))
    }

    pub fn close(&mut self, window_id: &WindowId) -> bool {
        self.dispatch(DesktopAction::CloseWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn focus(&mut self, window_id: &WindowId) -> bool {
        self.dispatch(DesktopAction::FocusWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn minimize(&mut self, window_id: &WindowId) -> bool {
        self.dispatch(DesktopAction::MinimizeWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn restore(&mut self, window_id: &WindowId) -> bool {
        self.dispatch(DesktopAction::RestoreWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn maximize(&mut self, window_id: &WindowId) -> bool {
        self.dispatch(DesktopAction::MaximizeWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn restore_maximized(&mut self, window_id: &WindowId) -> bool {
        self.dispatch(DesktopAction::RestoreMaximizedWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn move_window(&mut self, window_id: &WindowId, position: Position) -> bool {
        self.dispatch(DesktopAction::MoveWindow {
            window_id: window_id.clone(),
            position,
        })
    }

    pub fn resize(&mut self, window_id: &WindowId, size: Size) -> bool {
        self.dispatch(DesktopAction::ResizeWindow {
            window_id: window_id.clone(),
            size,
        })
    }

    pub fn show_desktop(&mut self) -> bool {
        self.dispatch(DesktopAction::ShowDesktop)
    }

    pub fn restore_all(&mut self) -> bool {
        self.dispatch(DesktopAction::RestoreAll)
    }

    pub fn set_desktop_size(&mut self, size: Size) -> bool {
        self.dispatch(DesktopAction::SetDesktopSize { size })
    }

    /// Applies restored windows and marks hydration complete.
    pub fn hydrate(&mut self, windows: Vec<WindowRecord>) -> bool {
        self.dispatch(DesktopAction::HydrateWindows { windows })
            && self.dispatch(DesktopAction::HydrationComplete)
    }

    /// Feeds a navigation change into the route bridge.
    pub fn navigation_changed(&mut self, path: impl Into<String>) -> bool {
        self.dispatch(DesktopAction::NavigationChanged { path: path.into() })
    }
}
