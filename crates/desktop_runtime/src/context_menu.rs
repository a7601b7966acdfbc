//! Contextual menu state machine: item trees per context, submenu chains, and viewport placement.
//!
//! A menu tree is either closed or a stack of open levels. Level 0 is the root menu opened at the
//! pointer; each deeper level is the submenu of the highlighted item one level up.

use crate::{
    model::{DesktopState, Position, Size, WindowId},
    reducer::{DesktopAction, OpenWindowRequest},
    routes,
};

/// Estimated menu width used for placement before the DOM is measured.
pub const MENU_WIDTH_PX: i32 = 220;
pub const MENU_ITEM_HEIGHT_PX: i32 = 28;
pub const MENU_PADDING_PX: i32 = 6;

/// What the user right-clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuContext {
    Desktop,
    Window(WindowId),
    Taskbar,
    /// A desktop icon, keyed by the component it launches.
    Icon(String),
}

/// Outcome of activating a menu item.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    Desktop(DesktopAction),
    /// Command routed to a collaborator outside the window manager.
    Command(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub action: Option<MenuAction>,
    pub submenu: Vec<MenuItem>,
    pub disabled: bool,
}

impl MenuItem {
    pub fn action(id: impl Into<String>, label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            action: Some(action),
            submenu: Vec::new(),
            disabled: false,
        }
    }

    pub fn submenu(id: impl Into<String>, label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            action: None,
            submenu: items,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn has_submenu(&self) -> bool {
        !self.submenu.is_empty()
    }
}

/// Item tree shown for `context` given the current desktop.
pub fn menu_items(context: &MenuContext, state: &DesktopState) -> Vec<MenuItem> {
    match context {
        MenuContext::Desktop => vec![
            MenuItem::submenu("open", "Open", open_items()),
            MenuItem::action(
                "show-desktop",
                "Show desktop",
                MenuAction::Desktop(DesktopAction::ShowDesktop),
            )
            .disabled(state.windows.iter().all(|w| w.minimized)),
            MenuItem::action(
                "restore-all",
                "Restore all windows",
                MenuAction::Desktop(DesktopAction::RestoreAll),
            )
            .disabled(!state.windows.iter().any(|w| w.minimized)),
            MenuItem::action(
                "settings",
                "Settings",
                MenuAction::Desktop(DesktopAction::OpenWindow(OpenWindowRequest::new(
                    "settings", "Settings", "Settings",
                ))),
            ),
        ],
        MenuContext::Window(window_id) => window_items(window_id, state),
        MenuContext::Taskbar => {
            let windows: Vec<MenuItem> = state
                .stacking_order()
                .into_iter()
                .rev()
                .map(|w| {
                    MenuItem::action(
                        format!("window-{}", w.id),
                        w.title.clone(),
                        MenuAction::Desktop(DesktopAction::RestoreWindow {
                            window_id: w.id.clone(),
                        }),
                    )
                })
                .collect();
            let no_windows = windows.is_empty();
            vec![
                MenuItem::submenu("windows", "Windows", windows).disabled(no_windows),
                MenuItem::action(
                    "show-desktop",
                    "Show desktop",
                    MenuAction::Desktop(DesktopAction::ShowDesktop),
                ),
                MenuItem::action(
                    "restore-all",
                    "Restore all windows",
                    MenuAction::Desktop(DesktopAction::RestoreAll),
                ),
            ]
        }
        MenuContext::Icon(component) => {
            let route = routes::route_table()
                .iter()
                .find(|entry| entry.component == component.as_str());
            let open = match route {
                Some(entry) => MenuItem::action(
                    "open",
                    "Open",
                    MenuAction::Desktop(DesktopAction::OpenWindow(
                        entry.open_request().with_navigation(),
                    )),
                ),
                None => MenuItem::action(
                    "open",
                    "Open",
                    MenuAction::Command(format!("icon.open:{component}")),
                )
                .disabled(true),
            };
            vec![
                open,
                MenuItem::action(
                    "properties",
                    "Properties",
                    MenuAction::Command(format!("icon.properties:{component}")),
                ),
            ]
        }
    }
}

fn open_items() -> Vec<MenuItem> {
    routes::route_table()
        .iter()
        .map(|entry| {
            MenuItem::action(
                format!("open-{}", entry.window_id),
                entry.title,
                MenuAction::Desktop(DesktopAction::OpenWindow(
                    entry.open_request().with_navigation(),
                )),
            )
        })
        .collect()
}

fn window_items(window_id: &WindowId, state: &DesktopState) -> Vec<MenuItem> {
    let Some(window) = state.window(window_id) else {
        return Vec::new();
    };
    let id = window_id.clone();
    let restore_or_minimize = if window.minimized {
        MenuItem::action(
            "restore",
            "Restore",
            MenuAction::Desktop(DesktopAction::RestoreWindow {
                window_id: id.clone(),
            }),
        )
    } else {
        MenuItem::action(
            "minimize",
            "Minimize",
            MenuAction::Desktop(DesktopAction::MinimizeWindow {
                window_id: id.clone(),
            }),
        )
    };
    let maximize = if window.is_maximized {
        MenuItem::action(
            "restore-size",
            "Restore size",
            MenuAction::Desktop(DesktopAction::RestoreMaximizedWindow {
                window_id: id.clone(),
            }),
        )
    } else {
        MenuItem::action(
            "maximize",
            "Maximize",
            MenuAction::Desktop(DesktopAction::MaximizeWindow {
                window_id: id.clone(),
            }),
        )
        .disabled(!state.desktop.is_measured())
    };
    vec![
        restore_or_minimize,
        maximize,
        MenuItem::action(
            "close",
            "Close",
            MenuAction::Desktop(DesktopAction::CloseWindow { window_id: id }),
        ),
    ]
}

/// Rendered footprint of a menu with `item_count` items.
pub fn menu_size(item_count: usize) -> Size {
    let rows = i32::try_from(item_count).unwrap_or(i32::MAX);
    Size::new(
        MENU_WIDTH_PX,
        rows.saturating_mul(MENU_ITEM_HEIGHT_PX)
            .saturating_add(MENU_PADDING_PX * 2),
    )
}

/// Places a menu of `size` whose preferred top-left is `anchor`.
///
/// Overflowing the right edge flips the menu to end at `flip_x` instead; overflowing the bottom
/// shifts it up. The result is then clamped inside the viewport.
pub fn place_menu(anchor: Position, flip_x: i32, size: Size, viewport: Size) -> Position {
    let mut x = anchor.x;
    if x + size.width > viewport.width {
        x = flip_x - size.width;
    }
    let mut y = anchor.y;
    if y + size.height > viewport.height {
        y = viewport.height - size.height;
    }
    Position {
        x: x.clamp(0, (viewport.width - size.width).max(0)),
        y: y.clamp(0, (viewport.height - size.height).max(0)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuLevel {
    pub items: Vec<MenuItem>,
    pub position: Position,
    pub highlighted: Option<usize>,
}

impl MenuLevel {
    pub fn size(&self) -> Size {
        menu_size(self.items.len())
    }

    fn enabled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.disabled)
            .map(|(idx, _)| idx)
    }
}

/// One menu tree. Empty `levels` means closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextMenuState {
    pub context: Option<MenuContext>,
    pub levels: Vec<MenuLevel>,
    viewport: Size,
}

impl ContextMenuState {
    pub fn is_open(&self) -> bool {
        !self.levels.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Opens the root menu for `context` at the pointer, replacing any open tree.
    pub fn open(
        &mut self,
        context: MenuContext,
        pointer: Position,
        viewport: Size,
        state: &DesktopState,
    ) {
        let items = menu_items(&context, state);
        if items.is_empty() {
            self.close();
            return;
        }
        let position = place_menu(pointer, pointer.x, menu_size(items.len()), viewport);
        self.viewport = viewport;
        self.context = Some(context);
        self.levels = vec![MenuLevel {
            items,
            position,
            highlighted: None,
        }];
    }

    pub fn close(&mut self) {
        self.context = None;
        self.levels.clear();
    }

    /// Pointer entered item `index` at `depth`: deeper levels close and a submenu opens if the
    /// item has one.
    pub fn hover(&mut self, depth: usize, index: usize) {
        let Some(level) = self.levels.get_mut(depth) else {
            return;
        };
        let Some(item) = level.items.get(index) else {
            return;
        };
        let disabled = item.disabled;
        level.highlighted = Some(index);
        self.levels.truncate(depth + 1);
        if !disabled {
            self.open_submenu(depth, index);
        }
    }

    fn open_submenu(&mut self, depth: usize, index: usize) {
        let Some(parent) = self.levels.get(depth) else {
            return;
        };
        let Some(item) = parent.items.get(index) else {
            return;
        };
        if !item.has_submenu() {
            return;
        }
        let size = menu_size(item.submenu.len());
        let row_offset = i32::try_from(index).unwrap_or(0) * MENU_ITEM_HEIGHT_PX;
        let anchor = Position::new(
            parent.position.x + parent.size().width,
            parent.position.y + row_offset,
        );
        let position = place_menu(anchor, parent.position.x, size, self.viewport);
        let items = item.submenu.clone();
        self.levels.push(MenuLevel {
            items,
            position,
            highlighted: None,
        });
    }

    /// Clicks item `index` at `depth`.
    ///
    /// An item with an action closes the tree and returns the action. A submenu item opens its
    /// submenu. Disabled items do nothing.
    pub fn activate(&mut self, depth: usize, index: usize) -> Option<MenuAction> {
        let item = self.levels.get(depth)?.items.get(index)?;
        if item.disabled {
            return None;
        }
        if let Some(action) = item.action.clone() {
            self.close();
            return Some(action);
        }
        self.hover(depth, index);
        None
    }

    /// Keyboard handling for the open tree. Returns `(handled, action)`.
    pub fn handle_key(&mut self, key: &str) -> (bool, Option<MenuAction>) {
        if !self.is_open() {
            return (false, None);
        }
        let depth = self.levels.len() - 1;
        match key {
            "Escape" => {
                self.close();
                (true, None)
            }
            "ArrowDown" => {
                self.move_highlight(depth, 1);
                (true, None)
            }
            "ArrowUp" => {
                self.move_highlight(depth, -1);
                (true, None)
            }
            "ArrowRight" => {
                let level = &self.levels[depth];
                let target = level
                    .highlighted
                    .filter(|index| level.items.get(*index).is_some_and(|item| !item.disabled));
                if let Some(index) = target {
                    self.open_submenu(depth, index);
                    if let Some(sub) = self.levels.get_mut(depth + 1) {
                        let first = sub.enabled_indices().next();
                        sub.highlighted = first;
                    }
                }
                (true, None)
            }
            "ArrowLeft" => {
                if depth > 0 {
                    self.levels.truncate(depth);
                }
                (true, None)
            }
            "Enter" | " " => {
                let highlighted = self.levels[depth].highlighted;
                let action = highlighted.and_then(|index| self.activate(depth, index));
                (true, action)
            }
            _ => (false, None),
        }
    }

    fn move_highlight(&mut self, depth: usize, delta: i32) {
        let Some(level) = self.levels.get_mut(depth) else {
            return;
        };
        let enabled: Vec<usize> = level.enabled_indices().collect();
        if enabled.is_empty() {
            return;
        }
        let len = enabled.len() as i32;
        let next = match level
            .highlighted
            .and_then(|current| enabled.iter().position(|idx| *idx == current))
        {
            Some(pos) => (pos as i32 + delta).rem_euclid(len) as usize,
            None if delta >= 0 => 0,
            None => enabled.len() - 1,
        };
        level.highlighted = Some(enabled[next]);
        self.levels.truncate(depth + 1);
    }
}
