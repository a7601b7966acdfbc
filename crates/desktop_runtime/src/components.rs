//! Desktop shell UI composition and pointer/keyboard plumbing.
//!
//! Components receive the [`DesktopRuntime`] handle as a prop. All state lives in the runtime;
//! components only translate DOM events into [`DesktopAction`] values and service calls.

mod a11y;
mod dialogs;
mod menus;
mod taskbar;
mod tray;
mod window;

use leptos::*;

pub use self::{
    dialogs::DialogLayer, menus::ContextMenuLayer, taskbar::Taskbar, tray::NotificationTrayView,
    window::DesktopWindow,
};
use self::a11y::focus_element_by_id;
use crate::{
    context_menu::MenuContext,
    frame::frame_views,
    model::{PointerPosition, Position, Size},
    reducer::DesktopAction,
    routes::{route_table, RouteEntry},
    runtime_context::DesktopRuntime,
};

#[component]
/// Renders the desktop surface, window layer, taskbar, and overlay services.
///
/// `on_menu_command` receives context-menu commands the window manager does not handle itself,
/// such as `"icon.properties:<component>"`.
pub fn DesktopShell(
    runtime: DesktopRuntime,
    #[prop(optional, into)] on_menu_command: Option<Callback<String>>,
) -> impl IntoView {
    let desktop_ref = create_node_ref::<html::Div>();
    let measure = move || {
        if let Some(desktop) = desktop_ref.get_untracked() {
            runtime.set_desktop_size(Size::new(desktop.client_width(), desktop.client_height()));
        }
    };
    desktop_ref.on_load(move |_| request_animation_frame(measure));
    let resize_listener = window_event_listener(ev::resize, move |_| measure());
    on_cleanup(move || resize_listener.remove());

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let (dragging, resizing) = runtime.interaction.with_untracked(|interaction| {
            (interaction.dragging.is_some(), interaction.resizing.is_some())
        });
        if dragging {
            runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
        }
        if resizing {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            tabindex="-1"
            on:mousedown=move |_| runtime.close_menu()
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div
                class="desktop-area"
                node_ref=desktop_ref
                style=move || {
                    runtime
                        .state
                        .with(|state| format!("bottom:{}px;", state.config.taskbar_height_px))
                }
                on:contextmenu=move |ev: web_sys::MouseEvent| {
                    stop_mouse_event(&ev);
                    runtime.open_menu(MenuContext::Desktop, Position::new(ev.client_x(), ev.client_y()));
                }
            >
                <DesktopIconGrid runtime />
                <div class="desktop-window-layer">
                    <For
                        each=move || runtime.state.with(frame_views)
                        key=|frame| frame.window_id.clone()
                        let:frame
                    >
                        <DesktopWindow runtime window_id=frame.window_id />
                    </For>
                </div>
            </div>

            <Taskbar runtime />
            <ContextMenuLayer runtime on_command=on_menu_command />
            <DialogLayer runtime />
        </div>
    }
}

#[component]
fn DesktopIconGrid(runtime: DesktopRuntime) -> impl IntoView {
    view! {
        <div class="desktop-icons" role="list">
            {route_table()
                .iter()
                .map(|route| view! { <DesktopIcon runtime route=*route /> })
                .collect_view()}
        </div>
    }
}

#[component]
fn DesktopIcon(runtime: DesktopRuntime, route: RouteEntry) -> impl IntoView {
    let dom_id = format!("desktop-icon-{}", route.window_id);
    let open = move || {
        runtime.dispatch_action(DesktopAction::OpenWindow(route.open_request().with_navigation()));
    };

    view! {
        <button
            id=dom_id.clone()
            class="desktop-icon"
            role="listitem"
            on:dblclick=move |ev| {
                stop_mouse_event(&ev);
                open();
            }
            on:keydown=move |ev: web_sys::KeyboardEvent| {
                if ev.key() == "Enter" {
                    ev.prevent_default();
                    open();
                }
            }
            on:contextmenu=move |ev: web_sys::MouseEvent| {
                stop_mouse_event(&ev);
                let _ = focus_element_by_id(&dom_id);
                runtime.open_menu(
                    MenuContext::Icon(route.component.to_string()),
                    Position::new(ev.client_x(), ev.client_y()),
                );
            }
        >
            <span class="desktop-icon-glyph" aria-hidden="true">
                {route.title.chars().next().unwrap_or('?').to_string()}
            </span>
            <span class="desktop-icon-label">{route.title}</span>
        </button>
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn end_active_pointer_interaction(runtime: DesktopRuntime) {
    let (dragging, resizing) = runtime.interaction.with_untracked(|interaction| {
        (interaction.dragging.is_some(), interaction.resizing.is_some())
    });
    if dragging {
        runtime.dispatch_action(DesktopAction::EndMove);
    }
    if resizing {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
}
