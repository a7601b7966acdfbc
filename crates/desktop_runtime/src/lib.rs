//! Virtual window manager for the marketplace desktop.
//!
//! The crate is layered bottom-up:
//!
//! - [`model`], [`layout`], and [`reducer`] hold the pure window state machine.
//! - [`controller::WindowController`] owns the state and queues [`RuntimeEffect`] values.
//! - [`host::DesktopHost`] executes those effects against `platform_host` services.
//! - [`runtime_context::DesktopRuntime`] and [`components`] bind everything to leptos.

pub mod components;
pub mod config;
pub mod context_menu;
pub mod controller;
pub mod dialogs;
pub mod frame;
pub mod host;
pub mod layout;
mod manifest;
pub mod model;
pub mod notifications;
pub mod persistence;
pub mod reducer;
pub mod routes;
pub mod runtime_context;

pub use components::DesktopShell;
pub use config::DesktopConfig;
pub use context_menu::{ContextMenuState, MenuAction, MenuContext, MenuItem};
pub use controller::{ListenerId, WindowController};
pub use dialogs::{DialogResponse, DialogService, InputDialogRequest, MessageBoxRequest, MessageKind};
pub use frame::{ContentRegistry, FrameView};
pub use host::DesktopHost;
pub use model::*;
pub use notifications::{Notification, NotificationId, NotificationTray};
pub use persistence::WindowLayoutStore;
pub use reducer::{reduce_desktop, DesktopAction, OpenWindowRequest, ReducerError, RuntimeEffect};
pub use routes::{match_route, route_table, RouteEntry};
pub use runtime_context::DesktopRuntime;
