use leptos::*;

use super::{stop_mouse_event, tray::NotificationTrayView};
use crate::{
    context_menu::MenuContext,
    model::{Position, WindowId},
    reducer::DesktopAction,
    runtime_context::DesktopRuntime,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TaskbarEntry {
    window_id: WindowId,
    title: String,
    active: bool,
    minimized: bool,
}

#[component]
/// Bottom bar with one button per open window, a show-desktop button, and the notification tray.
pub fn Taskbar(runtime: DesktopRuntime) -> impl IntoView {
    let entries = create_memo(move |_| {
        runtime.state.with(|state| {
            state
                .windows
                .iter()
                .map(|window| TaskbarEntry {
                    window_id: window.id.clone(),
                    title: window.title.clone(),
                    active: state.active_window.as_ref() == Some(&window.id),
                    minimized: window.minimized,
                })
                .collect::<Vec<_>>()
        })
    });

    view! {
        <footer
            class="taskbar"
            role="toolbar"
            aria-label="Taskbar"
            style=move || runtime.state.with(|state| format!("height:{}px;", state.config.taskbar_height_px))
            on:contextmenu=move |ev: web_sys::MouseEvent| {
                stop_mouse_event(&ev);
                runtime.open_menu(MenuContext::Taskbar, Position::new(ev.client_x(), ev.client_y()));
            }
        >
            <div class="taskbar-windows" role="group" aria-label="Open windows">
                <For each=move || entries.get() key=|entry| entry.clone() let:entry>
                    <TaskbarButton runtime entry />
                </For>
            </div>
            <button
                class="taskbar-show-desktop"
                type="button"
                aria-label="Show desktop"
                title="Show desktop"
                on:click=move |_| {
                    runtime.dispatch_action(DesktopAction::ShowDesktop);
                }
            ></button>
            <NotificationTrayView runtime />
        </footer>
    }
}

#[component]
fn TaskbarButton(runtime: DesktopRuntime, entry: TaskbarEntry) -> impl IntoView {
    let TaskbarEntry {
        window_id,
        title,
        active,
        minimized,
    } = entry;
    let menu_window_id = window_id.clone();

    view! {
        <button
            class="taskbar-window"
            class:active=active
            class:minimized=minimized
            type="button"
            aria-pressed=active.to_string()
            title=title.clone()
            on:click=move |_| {
                runtime.dispatch_action(DesktopAction::ToggleTaskbarWindow {
                    window_id: window_id.clone(),
                });
            }
            on:contextmenu=move |ev: web_sys::MouseEvent| {
                stop_mouse_event(&ev);
                runtime.open_menu(
                    MenuContext::Window(menu_window_id.clone()),
                    Position::new(ev.client_x(), ev.client_y()),
                );
            }
        >
            {title}
        </button>
    }
}
