//! Reducer actions, side-effect intents, and transition logic for the window manager.

use leptos::logging;
use platform_host::next_stamp_ms_after;
use thiserror::Error;

use crate::{
    layout::{
        cascade_position, clamp_size_to_desktop, clamp_to_desktop, default_size, fit_geometry,
        resize_geometry,
    },
    model::{
        DesktopState, DragSession, InteractionState, PointerPosition, Position, ResizeEdge,
        ResizeSession, Size, WindowId, WindowRecord,
    },
    routes,
};

/// Request to open (or re-focus) a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWindowRequest {
    pub window_id: WindowId,
    /// Symbolic name of the hosted content view.
    pub component: String,
    pub title: String,
    /// Ask the navigation system to show the window's route, if it has one.
    pub update_navigation: bool,
}

impl OpenWindowRequest {
    pub fn new(
        window_id: impl Into<WindowId>,
        component: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            window_id: window_id.into(),
            component: component.into(),
            title: title.into(),
            update_navigation: false,
        }
    }

    pub fn with_navigation(mut self) -> Self {
        self.update_navigation = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or raise and un-minimize it when the id is already open.
    OpenWindow(OpenWindowRequest),
    CloseWindow {
        window_id: WindowId,
    },
    /// Raise a window to the top of the stack (frame click).
    FocusWindow {
        window_id: WindowId,
    },
    MinimizeWindow {
        window_id: WindowId,
    },
    /// Un-minimize and raise a window.
    RestoreWindow {
        window_id: WindowId,
    },
    /// Maximize a window to the current desktop size.
    MaximizeWindow {
        window_id: WindowId,
    },
    /// Return a maximized window to its pre-maximize geometry.
    RestoreMaximizedWindow {
        window_id: WindowId,
    },
    /// Maximize or restore depending on the current state (title-bar double click).
    ToggleMaximize {
        window_id: WindowId,
    },
    /// Taskbar button behavior: restore if minimized, minimize if active, raise otherwise.
    ToggleTaskbarWindow {
        window_id: WindowId,
    },
    MoveWindow {
        window_id: WindowId,
        position: Position,
    },
    ResizeWindow {
        window_id: WindowId,
        size: Size,
    },
    /// Minimize every window.
    ShowDesktop,
    /// Un-minimize every window.
    RestoreAll,
    /// Report a new measurement of the desktop container.
    SetDesktopSize {
        size: Size,
    },
    BeginMove {
        window_id: WindowId,
        pointer: PointerPosition,
    },
    UpdateMove {
        pointer: PointerPosition,
    },
    EndMove,
    BeginResize {
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: PointerPosition,
    },
    UpdateResize {
        pointer: PointerPosition,
    },
    EndResize,
    /// Apply windows restored from persistence.
    HydrateWindows {
        windows: Vec<WindowRecord>,
    },
    /// Boot hydration finished; parked navigation may now open windows.
    HydrationComplete,
    /// The navigation system moved to `path`.
    NavigationChanged {
        path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Persist the current window list.
    PersistLayout,
    /// Drop persisted auxiliary records of a closed window.
    ForgetWindow(WindowId),
    /// Prune persisted auxiliary records not belonging to these windows.
    CleanupPersisted(Vec<WindowId>),
    /// Ask the navigation system to show `path` unless it already does.
    Navigate(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that cannot apply to the current state.
pub enum ReducerError {
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
    #[error("desktop size has not been measured yet")]
    DesktopNotMeasured,
    #[error("window `{0}` is maximized")]
    WindowMaximized(WindowId),
}

/// Applies a [`DesktopAction`] to the window-manager state and collects resulting side effects.
///
/// This is the single mutation path for window lifecycle and geometry. The active window is
/// recomputed after every action.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action references an unknown window or cannot apply to
/// its current state. State may be partially updated on error; callers reduce on a copy.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let z_index = next_z_index(state);
            if let Some(window) = state.windows.iter_mut().find(|w| w.id == req.window_id) {
                window.minimized = false;
                window.z_index = z_index;
            } else {
                let size = default_size(&req.component, state.desktop, &state.config);
                let position = cascade_position(&state.windows, state.desktop, size, &state.config);
                state.windows.push(WindowRecord {
                    id: req.window_id.clone(),
                    title: req.title,
                    component: req.component,
                    minimized: false,
                    is_maximized: false,
                    position,
                    size,
                    z_index,
                    prev_state: None,
                });
            }
            if req.update_navigation {
                if let Some(route) = routes::route_for_window(&req.window_id) {
                    effects.push(RuntimeEffect::Navigate(route.path.to_string()));
                }
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            interaction.release_window(&window_id);
            effects.push(RuntimeEffect::ForgetWindow(window_id));
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::FocusWindow { window_id } => {
            let already_active = state.active_window.as_ref() == Some(&window_id);
            let window = find_window(state, &window_id)?;
            if !(already_active && window.z_index == state.top_z_index()) {
                raise_window(state, &window_id)?;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            find_window_mut(state, &window_id)?.minimized = true;
            interaction.release_window(&window_id);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::RestoreWindow { window_id } => {
            raise_window(state, &window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MaximizeWindow { window_id } => {
            let desktop = state.desktop;
            let window = find_window_mut(state, &window_id)?;
            if !window.is_maximized {
                if !desktop.is_measured() {
                    return Err(ReducerError::DesktopNotMeasured);
                }
                window.prev_state = Some(window.geometry());
                window.position = Position::ORIGIN;
                window.size = desktop;
                window.is_maximized = true;
                interaction.release_window(&window_id);
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::RestoreMaximizedWindow { window_id } => {
            let desktop = state.desktop;
            let min = state.config.min_window_size;
            let window = find_window_mut(state, &window_id)?;
            if window.is_maximized {
                let target = window.prev_state.take().unwrap_or_else(|| window.geometry());
                window.set_geometry(fit_geometry(target, desktop, min));
                window.is_maximized = false;
                effects.push(RuntimeEffect::PersistLayout);
            } else if window.prev_state.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let maximized = find_window(state, &window_id)?.is_maximized;
            let next = if maximized {
                DesktopAction::RestoreMaximizedWindow { window_id }
            } else {
                DesktopAction::MaximizeWindow { window_id }
            };
            effects.extend(reduce_desktop(state, interaction, next)?);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let minimized = find_window(state, &window_id)?.minimized;
            let active = state.active_window.as_ref() == Some(&window_id);
            let next = if minimized {
                DesktopAction::RestoreWindow { window_id }
            } else if active {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            effects.extend(reduce_desktop(state, interaction, next)?);
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            let desktop = state.desktop;
            let window = find_window_mut(state, &window_id)?;
            if window.is_maximized {
                return Err(ReducerError::WindowMaximized(window_id));
            }
            window.position = clamp_to_desktop(position, window.size, desktop);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ResizeWindow { window_id, size } => {
            let desktop = state.desktop;
            let min = state.config.min_window_size;
            let window = find_window_mut(state, &window_id)?;
            if window.is_maximized {
                return Err(ReducerError::WindowMaximized(window_id));
            }
            window.size = clamp_size_to_desktop(window.position, size, desktop, min);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ShowDesktop => {
            for window in &mut state.windows {
                window.minimized = true;
            }
            *interaction = InteractionState::default();
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::RestoreAll => {
            for window in &mut state.windows {
                window.minimized = false;
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetDesktopSize { size } => {
            let size = Size::new(size.width.max(0), size.height.max(0));
            state.desktop = size;
            if size.is_measured() && fit_windows_to_desktop(state) {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window = find_window(state, &window_id)?;
            let maximized = window.is_maximized;
            let geometry_start = window.geometry();
            raise_window(state, &window_id)?;
            if !maximized {
                interaction.dragging = Some(DragSession {
                    window_id,
                    pointer_start: pointer,
                    geometry_start,
                });
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.clone() {
                let desktop = state.desktop;
                match state.windows.iter_mut().find(|w| w.id == session.window_id) {
                    Some(window) if !window.is_maximized => {
                        let target = session.geometry_start.position.offset(
                            pointer.x - session.pointer_start.x,
                            pointer.y - session.pointer_start.y,
                        );
                        window.position = clamp_to_desktop(target, window.size, desktop);
                    }
                    Some(_) => {}
                    None => interaction.dragging = None,
                }
            }
        }
        DesktopAction::EndMove => {
            if interaction.dragging.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = find_window(state, &window_id)?;
            let maximized = window.is_maximized;
            let geometry_start = window.geometry();
            raise_window(state, &window_id)?;
            if !maximized {
                interaction.resizing = Some(ResizeSession {
                    window_id,
                    edge,
                    pointer_start: pointer,
                    geometry_start,
                });
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.clone() {
                let desktop = state.desktop;
                let min = state.config.min_window_size;
                match state.windows.iter_mut().find(|w| w.id == session.window_id) {
                    Some(window) if !window.is_maximized => {
                        let next = resize_geometry(
                            session.geometry_start,
                            session.edge,
                            pointer.x - session.pointer_start.x,
                            pointer.y - session.pointer_start.y,
                            min,
                        );
                        window.set_geometry(fit_geometry(next, desktop, min));
                    }
                    Some(_) => {}
                    None => interaction.resizing = None,
                }
            }
        }
        DesktopAction::EndResize => {
            if interaction.resizing.take().is_some() {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::HydrateWindows { windows } => {
            hydrate_windows(state, windows);
        }
        DesktopAction::HydrationComplete => {
            state.hydrated = true;
            effects.push(RuntimeEffect::CleanupPersisted(state.window_ids()));
            effects.push(RuntimeEffect::PersistLayout);
            if let Some(path) = state.pending_route.take() {
                effects.extend(reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::NavigationChanged { path },
                )?);
            }
        }
        DesktopAction::NavigationChanged { path } => {
            if !state.hydrated {
                state.pending_route = Some(path);
            } else if let Some(route) = routes::match_route(&path) {
                effects.extend(reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::OpenWindow(route.open_request()),
                )?);
            }
        }
    }

    if !state.hydrated {
        // The saved layout has not been read yet; `HydrationComplete` persists the merged list.
        effects.retain(|effect| matches!(effect, RuntimeEffect::Navigate(_)));
    }
    normalize_window_stack(state);
    Ok(effects)
}

/// Recomputes the active window: the highest `z_index` among non-minimized windows.
pub fn normalize_window_stack(state: &mut DesktopState) {
    state.active_window = state
        .windows
        .iter()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone());
}

fn next_z_index(state: &DesktopState) -> u64 {
    next_stamp_ms_after(state.top_z_index())
}

fn find_window<'a>(
    state: &'a DesktopState,
    window_id: &WindowId,
) -> Result<&'a WindowRecord, ReducerError> {
    state
        .window(window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

fn raise_window(state: &mut DesktopState, window_id: &WindowId) -> Result<(), ReducerError> {
    let z_index = next_z_index(state);
    let window = find_window_mut(state, window_id)?;
    window.minimized = false;
    window.z_index = z_index;
    Ok(())
}

/// Re-applies desktop bounds to every window. Returns whether any window changed.
fn fit_windows_to_desktop(state: &mut DesktopState) -> bool {
    let desktop = state.desktop;
    let mut changed = false;
    for window in &mut state.windows {
        let before = window.geometry();
        if window.is_maximized {
            window.position = Position::ORIGIN;
            window.size = desktop;
        } else {
            window.position = clamp_to_desktop(window.position, window.size, desktop);
        }
        changed |= before != window.geometry();
    }
    changed
}

fn hydrate_windows(state: &mut DesktopState, restored: Vec<WindowRecord>) {
    let desktop = state.desktop;
    let restored_count = restored.len();
    let mut merged: Vec<WindowRecord> = Vec::with_capacity(restored_count + state.windows.len());

    for mut record in restored {
        if merged.iter().any(|w| w.id == record.id) {
            logging::warn!("dropping duplicate restored window `{}`", record.id);
            continue;
        }
        if record.is_maximized && record.prev_state.is_none() {
            record.is_maximized = false;
        }
        if !record.is_maximized {
            record.prev_state = None;
        }
        record.size = Size::new(record.size.width.max(1), record.size.height.max(1));
        record.position = clamp_to_desktop(record.position, record.size, desktop);
        merged.push(record);
    }

    // Windows opened before hydration finished stay open alongside restored ones.
    for window in state.windows.drain(..) {
        if !merged.iter().any(|w| w.id == window.id) {
            merged.push(window);
        }
    }

    state.windows = merged;
    if desktop.is_measured() {
        fit_windows_to_desktop(state);
    }
    logging::log!("hydrated {restored_count} window(s) from persisted layout");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowGeometry;

    fn measured_state() -> DesktopState {
        let mut state = DesktopState::default();
        state.desktop = Size::new(1000, 700);
        state.hydrated = true;
        state
    }

    fn dispatch(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        action: DesktopAction,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(state, interaction, action).expect("action applies")
    }

    fn open(state: &mut DesktopState, interaction: &mut InteractionState, id: &str) -> WindowId {
        dispatch(
            state,
            interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(id, "Foo", id)),
        );
        WindowId::from(id)
    }

    fn window<'a>(state: &'a DesktopState, id: &WindowId) -> &'a WindowRecord {
        state.window(id).expect("window exists")
    }

    #[test]
    fn open_creates_window_with_default_geometry_and_activates_it() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();

        let a = open(&mut state, &mut interaction, "A");

        assert_eq!(state.windows.len(), 1);
        let record = window(&state, &a);
        assert!(!record.minimized);
        assert!(!record.is_maximized);
        assert_eq!(record.position, Position::new(32, 32));
        assert_eq!(record.size, Size::new(600, 490));
        assert_eq!(state.active_window, Some(a));
    }

    #[test]
    fn reopening_is_idempotent_and_raises() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();

        let a = open(&mut state, &mut interaction, "A");
        let first_z = window(&state, &a).z_index;
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow {
                window_id: a.clone(),
            },
        );
        open(&mut state, &mut interaction, "A");

        assert_eq!(state.windows.len(), 1);
        assert!(window(&state, &a).z_index > first_z);
        assert!(!window(&state, &a).minimized);
        assert_eq!(state.active_window, Some(a));
    }

    #[test]
    fn open_and_restore_sequence_yields_strictly_increasing_z_indices() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let mut observed = Vec::new();

        for id in ["A", "B", "A", "C", "B"] {
            let window_id = open(&mut state, &mut interaction, id);
            observed.push(window(&state, &window_id).z_index);
        }
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreWindow {
                window_id: WindowId::from("C"),
            },
        );
        observed.push(window(&state, &WindowId::from("C")).z_index);

        assert!(observed.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn minimize_moves_activation_to_next_highest_window() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();

        let a = open(&mut state, &mut interaction, "A");
        let b = open(&mut state, &mut interaction, "B");
        assert_eq!(state.active_window, Some(b.clone()));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: b.clone() },
        );
        assert!(window(&state, &b).minimized);
        assert_eq!(state.active_window, Some(a.clone()));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: a },
        );
        assert_eq!(state.active_window, None);
    }

    #[test]
    fn maximize_then_restore_round_trips_geometry() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MoveWindow {
                window_id: a.clone(),
                position: Position::new(140, 75),
            },
        );
        let before = window(&state, &a).geometry();

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: a.clone() },
        );
        let maximized = window(&state, &a);
        assert!(maximized.is_maximized);
        assert_eq!(maximized.position, Position::ORIGIN);
        assert_eq!(maximized.size, Size::new(1000, 700));
        assert_eq!(maximized.prev_state, Some(before));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreMaximizedWindow { window_id: a.clone() },
        );
        let restored = window(&state, &a);
        assert_eq!(restored.geometry(), before);
        assert!(!restored.is_maximized);
        assert_eq!(restored.prev_state, None);
    }

    #[test]
    fn maximize_twice_keeps_original_snapshot() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        let before = window(&state, &a).geometry();

        for _ in 0..2 {
            dispatch(
                &mut state,
                &mut interaction,
                DesktopAction::MaximizeWindow { window_id: a.clone() },
            );
        }
        assert_eq!(window(&state, &a).prev_state, Some(before));
    }

    #[test]
    fn maximize_requires_measured_desktop() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");

        let result = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: a },
        );
        assert_eq!(result, Err(ReducerError::DesktopNotMeasured));
    }

    #[test]
    fn restore_maximized_clears_stale_snapshot_on_normal_window() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        let geometry = window(&state, &a).geometry();
        state.windows[0].prev_state = Some(geometry);

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreMaximizedWindow { window_id: a.clone() },
        );
        assert_eq!(window(&state, &a).prev_state, None);
        assert_eq!(effects, vec![RuntimeEffect::PersistLayout]);
    }

    #[test]
    fn restore_maximized_without_snapshot_keeps_window_on_desktop() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        state.windows[0].is_maximized = true;
        state.windows[0].position = Position::new(900, 650);

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreMaximizedWindow { window_id: a.clone() },
        );
        let record = window(&state, &a);
        assert!(!record.is_maximized);
        assert!(record.position.x + record.size.width <= 1000);
        assert!(record.position.y + record.size.height <= 700);
    }

    #[test]
    fn maximized_window_tracks_desktop_resize() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: a.clone() },
        );

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::SetDesktopSize {
                size: Size::new(1280, 800),
            },
        );
        assert_eq!(window(&state, &a).size, Size::new(1280, 800));
        assert_eq!(window(&state, &a).position, Position::ORIGIN);
    }

    #[test]
    fn desktop_shrink_reclamps_windows() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MoveWindow {
                window_id: a.clone(),
                position: Position::new(400, 210),
            },
        );

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::SetDesktopSize {
                size: Size::new(800, 600),
            },
        );
        let record = window(&state, &a);
        assert_eq!(record.position, Position::new(200, 110));
        assert!(effects.contains(&RuntimeEffect::PersistLayout));
    }

    #[test]
    fn restore_after_desktop_shrink_reclamps_snapshot() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MoveWindow {
                window_id: a.clone(),
                position: Position::new(400, 210),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: a.clone() },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::SetDesktopSize {
                size: Size::new(700, 500),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreMaximizedWindow { window_id: a.clone() },
        );

        let record = window(&state, &a);
        assert!(record.position.x + record.size.width <= 700);
        assert!(record.position.y + record.size.height <= 500);
    }

    #[test]
    fn move_clamps_and_rejects_maximized_windows() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MoveWindow {
                window_id: a.clone(),
                position: Position::new(-100, 5000),
            },
        );
        assert_eq!(window(&state, &a).position, Position::new(0, 210));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: a.clone() },
        );
        let result = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MoveWindow {
                window_id: a.clone(),
                position: Position::new(10, 10),
            },
        );
        assert_eq!(result, Err(ReducerError::WindowMaximized(a)));
    }

    #[test]
    fn resize_applies_minimum_and_keeps_position() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        let position = window(&state, &a).position;

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ResizeWindow {
                window_id: a.clone(),
                size: Size::new(50, 2000),
            },
        );
        let record = window(&state, &a);
        assert_eq!(record.position, position);
        assert_eq!(record.size, Size::new(220, 700 - position.y));
    }

    #[test]
    fn unknown_window_is_reported() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let missing = WindowId::from("ghost");

        for action in [
            DesktopAction::CloseWindow {
                window_id: missing.clone(),
            },
            DesktopAction::MinimizeWindow {
                window_id: missing.clone(),
            },
            DesktopAction::MaximizeWindow {
                window_id: missing.clone(),
            },
            DesktopAction::MoveWindow {
                window_id: missing.clone(),
                position: Position::ORIGIN,
            },
        ] {
            assert_eq!(
                reduce_desktop(&mut state, &mut interaction, action),
                Err(ReducerError::WindowNotFound(missing.clone()))
            );
        }
    }

    #[test]
    fn close_forgets_window_and_reactivates_remaining() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        let b = open(&mut state, &mut interaction, "B");

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: b.clone() },
        );
        assert_eq!(
            effects,
            vec![RuntimeEffect::ForgetWindow(b.clone()), RuntimeEffect::PersistLayout]
        );
        assert!(state.window(&b).is_none());
        assert_eq!(state.active_window, Some(a));
    }

    #[test]
    fn show_desktop_then_restore_all_reactivates_highest_window() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "A");
        let b = open(&mut state, &mut interaction, "B");
        open(&mut state, &mut interaction, "C");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { window_id: b.clone() },
        );

        dispatch(&mut state, &mut interaction, DesktopAction::ShowDesktop);
        assert!(state.windows.iter().all(|w| w.minimized));
        assert_eq!(state.active_window, None);

        dispatch(&mut state, &mut interaction, DesktopAction::RestoreAll);
        assert!(state.windows.iter().all(|w| !w.minimized));
        assert_eq!(state.active_window, Some(b));
    }

    #[test]
    fn taskbar_toggle_minimizes_active_and_restores_minimized() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: a.clone() },
        );
        assert!(window(&state, &a).minimized);

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: a.clone() },
        );
        assert!(!window(&state, &a).minimized);
        assert_eq!(state.active_window, Some(a));
    }

    #[test]
    fn focusing_active_top_window_emits_nothing() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        let before = state.clone();

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { window_id: a },
        );
        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn drag_moves_clamped_and_persists_on_end() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        let start = window(&state, &a).position;

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: a.clone(),
                pointer: PointerPosition { x: 10, y: 10 },
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 35, y: 50 },
            },
        );
        assert_eq!(window(&state, &a).position, start.offset(25, 40));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 5000, y: -5000 },
            },
        );
        assert_eq!(window(&state, &a).position, Position::new(400, 0));

        let effects = dispatch(&mut state, &mut interaction, DesktopAction::EndMove);
        assert_eq!(effects, vec![RuntimeEffect::PersistLayout]);
        assert!(interaction.dragging.is_none());
    }

    #[test]
    fn drag_after_close_does_not_resurrect_window() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: a.clone(),
                pointer: PointerPosition { x: 0, y: 0 },
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: a.clone() },
        );

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 40, y: 40 },
            },
        );
        let effects = dispatch(&mut state, &mut interaction, DesktopAction::EndMove);
        assert!(state.windows.is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn resize_gesture_from_west_edge_moves_left_edge() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let a = open(&mut state, &mut interaction, "A");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MoveWindow {
                window_id: a.clone(),
                position: Position::new(200, 100),
            },
        );
        let before = window(&state, &a).geometry();

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id: a.clone(),
                edge: ResizeEdge::West,
                pointer: PointerPosition { x: 200, y: 300 },
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateResize {
                pointer: PointerPosition { x: 150, y: 300 },
            },
        );
        let after = window(&state, &a).geometry();
        assert_eq!(after.position.x, before.position.x - 50);
        assert_eq!(after.size.width, before.size.width + 50);
        assert_eq!(
            dispatch(&mut state, &mut interaction, DesktopAction::EndResize),
            vec![RuntimeEffect::PersistLayout]
        );
    }

    #[test]
    fn open_with_navigation_emits_route_path() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::OpenWindow(
                OpenWindowRequest::new("requests", "Requests", "My Requests").with_navigation(),
            ),
        );
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::Navigate("/requests".to_string()),
                RuntimeEffect::PersistLayout
            ]
        );
    }

    #[test]
    fn navigation_before_hydration_is_parked_until_complete() {
        let mut state = DesktopState::default();
        state.desktop = Size::new(1000, 700);
        let mut interaction = InteractionState::default();

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::NavigationChanged {
                path: "/requests/9".to_string(),
            },
        );
        assert!(state.windows.is_empty());

        let restored = WindowRecord {
            id: WindowId::from("requests"),
            title: "My Requests".to_string(),
            component: "Requests".to_string(),
            minimized: true,
            is_maximized: false,
            position: Position::new(80, 80),
            size: Size::new(640, 480),
            z_index: 10,
            prev_state: None,
        };
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::HydrateWindows {
                windows: vec![restored],
            },
        );
        let effects = dispatch(&mut state, &mut interaction, DesktopAction::HydrationComplete);

        assert_eq!(state.windows.len(), 1);
        let record = window(&state, &WindowId::from("requests"));
        assert_eq!(record.position, Position::new(80, 80));
        assert!(!record.minimized);
        assert_eq!(state.active_window, Some(WindowId::from("requests")));
        assert_eq!(
            effects[0],
            RuntimeEffect::CleanupPersisted(vec![WindowId::from("requests")])
        );
    }

    #[test]
    fn changes_before_hydration_only_emit_navigation() {
        let mut state = measured_state();
        state.hydrated = false;
        let mut interaction = InteractionState::default();

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::OpenWindow(
                OpenWindowRequest::new("requests", "Requests", "My Requests").with_navigation(),
            ),
        );
        assert_eq!(effects, vec![RuntimeEffect::Navigate("/requests".to_string())]);

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow {
                window_id: WindowId::from("requests"),
            },
        );
        assert!(effects.is_empty());

        let effects = dispatch(&mut state, &mut interaction, DesktopAction::HydrationComplete);
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::CleanupPersisted(Vec::new()),
                RuntimeEffect::PersistLayout
            ]
        );
    }

    #[test]
    fn unmatched_navigation_is_ignored() {
        let mut state = measured_state();
        let mut interaction = InteractionState::default();
        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::NavigationChanged {
                path: "/nowhere".to_string(),
            },
        );
        assert!(effects.is_empty());
        assert!(state.windows.is_empty());
    }

    #[test]
    fn hydration_repairs_inconsistent_records_and_keeps_early_windows() {
        let mut state = measured_state();
        state.hydrated = false;
        let mut interaction = InteractionState::default();
        let early = open(&mut state, &mut interaction, "early");

        let bogus_max = WindowRecord {
            id: WindowId::from("max"),
            title: "Max".to_string(),
            component: "Foo".to_string(),
            minimized: false,
            is_maximized: true,
            position: Position::new(3000, 3000),
            size: Size::new(300, 200),
            z_index: 5,
            prev_state: None,
        };
        let stale_prev = WindowRecord {
            id: WindowId::from("stale"),
            is_maximized: false,
            prev_state: Some(WindowGeometry {
                position: Position::ORIGIN,
                size: Size::new(10, 10),
            }),
            ..bogus_max.clone()
        };
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::HydrateWindows {
                windows: vec![bogus_max.clone(), stale_prev, bogus_max],
            },
        );

        assert_eq!(
            state.window_ids(),
            vec![WindowId::from("max"), WindowId::from("stale"), early.clone()]
        );
        let max = window(&state, &WindowId::from("max"));
        assert!(!max.is_maximized);
        assert_eq!(max.position, Position::new(700, 500));
        assert_eq!(window(&state, &WindowId::from("stale")).prev_state, None);
        assert_eq!(state.active_window, Some(early));
    }
}
