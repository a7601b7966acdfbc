//! Render model for window frames: stacking, chrome state, and title-bar control mapping.
//!
//! [`crate::components`] turns these values into DOM; everything here is plain data so frame
//! behavior can be tested without a browser.

use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    model::{DesktopState, ResizeEdge, WindowGeometry, WindowId, WindowRecord},
    reducer::DesktopAction,
};

/// Everything a frame needs to render one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub window_id: WindowId,
    pub title: String,
    pub component: String,
    pub active: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub z_index: u64,
    /// 1-based position in stacking order. CSS `z-index` cannot hold timestamp-sized values.
    pub stack_level: usize,
    pub geometry: WindowGeometry,
}

impl FrameView {
    fn from_record(record: &WindowRecord, active: Option<&WindowId>, stack_level: usize) -> Self {
        Self {
            window_id: record.id.clone(),
            title: record.title.clone(),
            component: record.component.clone(),
            active: active == Some(&record.id),
            minimized: record.minimized,
            maximized: record.is_maximized,
            z_index: record.z_index,
            stack_level,
            geometry: record.geometry(),
        }
    }

    pub fn class(&self) -> String {
        let mut class = String::from("desktop-window");
        if self.active {
            class.push_str(" active");
        }
        if self.minimized {
            class.push_str(" minimized");
        }
        if self.maximized {
            class.push_str(" maximized");
        }
        class
    }

    /// Inline CSS placing the frame on the desktop.
    pub fn style(&self) -> String {
        let WindowGeometry { position, size } = self.geometry;
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
            position.x, position.y, size.width, size.height, self.stack_level
        )
    }

    /// Resize handles are hidden while maximized.
    pub fn resizable(&self) -> bool {
        !self.maximized
    }

    pub fn dom_id(&self) -> String {
        format!("desktop-window-{}", self.window_id)
    }
}

pub fn frame_view(state: &DesktopState, window_id: &WindowId) -> Option<FrameView> {
    state
        .stacking_order()
        .into_iter()
        .enumerate()
        .find(|(_, record)| &record.id == window_id)
        .map(|(index, record)| FrameView::from_record(record, state.active_window.as_ref(), index + 1))
}

/// Frames back to front; the last entry is drawn topmost.
pub fn frame_views(state: &DesktopState) -> Vec<FrameView> {
    state
        .stacking_order()
        .into_iter()
        .enumerate()
        .map(|(index, record)| FrameView::from_record(record, state.active_window.as_ref(), index + 1))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleBarControl {
    Minimize,
    MaximizeOrRestore,
    Close,
}

impl TitleBarControl {
    pub const ALL: [TitleBarControl; 3] = [
        TitleBarControl::Minimize,
        TitleBarControl::MaximizeOrRestore,
        TitleBarControl::Close,
    ];

    pub fn action(self, frame: &FrameView) -> DesktopAction {
        let window_id = frame.window_id.clone();
        match self {
            Self::Minimize => DesktopAction::MinimizeWindow { window_id },
            Self::MaximizeOrRestore if frame.maximized => {
                DesktopAction::RestoreMaximizedWindow { window_id }
            }
            Self::MaximizeOrRestore => DesktopAction::MaximizeWindow { window_id },
            Self::Close => DesktopAction::CloseWindow { window_id },
        }
    }

    pub fn aria_label(self, frame: &FrameView) -> &'static str {
        match self {
            Self::Minimize => "Minimize window",
            Self::MaximizeOrRestore if frame.maximized => "Restore window",
            Self::MaximizeOrRestore => "Maximize window",
            Self::Close => "Close window",
        }
    }

    pub fn glyph(self, frame: &FrameView) -> &'static str {
        match self {
            Self::Minimize => "\u{2013}",
            Self::MaximizeOrRestore if frame.maximized => "\u{2750}",
            Self::MaximizeOrRestore => "\u{25a1}",
            Self::Close => "\u{2715}",
        }
    }
}

pub fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}

type ContentFactory<V> = Rc<dyn Fn(&WindowRecord) -> V>;

/// Maps component names to content factories hosted inside frames.
pub struct ContentRegistry<V> {
    factories: BTreeMap<String, ContentFactory<V>>,
}

impl<V> Default for ContentRegistry<V> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<V> Clone for ContentRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<V> fmt::Debug for ContentRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("components", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<V> ContentRegistry<V> {
    pub fn register(
        &mut self,
        component: impl Into<String>,
        factory: impl Fn(&WindowRecord) -> V + 'static,
    ) {
        self.factories.insert(component.into(), Rc::new(factory));
    }

    pub fn with(
        mut self,
        component: impl Into<String>,
        factory: impl Fn(&WindowRecord) -> V + 'static,
    ) -> Self {
        self.register(component, factory);
        self
    }

    pub fn contains(&self, component: &str) -> bool {
        self.factories.contains_key(component)
    }

    /// Builds content for `window`, or `None` when its component is not registered.
    pub fn render(&self, window: &WindowRecord) -> Option<V> {
        self.factories
            .get(&window.component)
            .map(|factory| factory(window))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{InteractionState, Size},
        reducer::{reduce_desktop, OpenWindowRequest},
    };

    fn desktop_with(ids: &[&str]) -> DesktopState {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SetDesktopSize {
                size: Size::new(1000, 700),
            },
        )
        .expect("measure");
        for id in ids {
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::OpenWindow(OpenWindowRequest::new(*id, "Foo", *id)),
            )
            .expect("open");
        }
        state
    }

    #[test]
    fn frames_follow_z_order_with_single_active_frame() {
        let mut state = desktop_with(&["a", "b", "c"]);
        let mut interaction = InteractionState::default();
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow {
                window_id: WindowId::from("a"),
            },
        )
        .expect("focus");

        let frames = frame_views(&state);
        let order: Vec<&str> = frames.iter().map(|f| f.window_id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(frames.iter().filter(|f| f.active).count(), 1);
        assert!(frames[2].active);
        assert_eq!(frames[2].class(), "desktop-window active");
    }

    #[test]
    fn style_places_frame_by_geometry() {
        let state = desktop_with(&["a", "b"]);
        let frames = frame_views(&state);
        assert_eq!(
            frames[0].style(),
            "left:32px;top:32px;width:600px;height:490px;z-index:1;"
        );
        assert_eq!(frames[1].stack_level, 2);
        assert_eq!(frame_view(&state, &WindowId::from("a")), Some(frames[0].clone()));
    }

    #[test]
    fn maximize_control_toggles_with_frame_state() {
        let mut state = desktop_with(&["a"]);
        let frame = frame_views(&state).remove(0);
        let control = TitleBarControl::MaximizeOrRestore;
        assert_eq!(control.aria_label(&frame), "Maximize window");
        let action = control.action(&frame);
        assert_eq!(
            action,
            DesktopAction::MaximizeWindow {
                window_id: WindowId::from("a")
            }
        );

        reduce_desktop(&mut state, &mut InteractionState::default(), action).expect("maximize");
        let frame = frame_views(&state).remove(0);
        assert!(!frame.resizable());
        assert_eq!(frame.class(), "desktop-window active maximized");
        assert_eq!(control.aria_label(&frame), "Restore window");
        assert_eq!(
            control.action(&frame),
            DesktopAction::RestoreMaximizedWindow {
                window_id: WindowId::from("a")
            }
        );
    }

    #[test]
    fn registry_renders_known_components_only() {
        let registry = ContentRegistry::default().with("Foo", |w: &WindowRecord| {
            format!("content for {}", w.id)
        });
        let state = desktop_with(&["a"]);
        let mut window = state.windows[0].clone();

        assert_eq!(registry.render(&window), Some("content for a".to_string()));
        window.component = "Unknown".to_string();
        assert_eq!(registry.render(&window), None);
        assert!(registry.contains("Foo"));
    }
}
