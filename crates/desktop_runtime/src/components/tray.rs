use leptos::*;

use super::stop_mouse_event;
use crate::{
    notifications::{Notification, NotificationTray},
    runtime_context::DesktopRuntime,
};

#[component]
/// Taskbar tray icon with unread badge, the transient popup, and the history panel.
pub fn NotificationTrayView(runtime: DesktopRuntime) -> impl IntoView {
    let tray = runtime.tray;
    let unread = create_memo(move |_| tray.with(NotificationTray::unread));
    let history_open = create_memo(move |_| tray.with(NotificationTray::history_open));
    let popup = create_memo(move |_| tray.with(|tray| tray.popup().cloned()));
    let items = create_memo(move |_| tray.with(|tray| tray.items().to_vec()));

    view! {
        <div class="notification-tray">
            <button
                class="tray-icon"
                type="button"
                aria-label=move || format!("Notifications ({} unread)", unread.get())
                aria-expanded=move || history_open.get().to_string()
                on:mousedown=|ev: web_sys::MouseEvent| ev.stop_propagation()
                on:click=move |_| tray.update(NotificationTray::toggle_history)
            >
                <span aria-hidden="true">"🔔"</span>
                <Show when=move || { unread.get() > 0 }>
                    <span class="tray-badge">{move || unread.get()}</span>
                </Show>
            </button>

            {move || popup.get().map(|notification| view! { <NotificationPopup runtime notification /> })}

            <Show when=move || history_open.get()>
                <div class="notification-history" role="region" aria-label="Notification history">
                    <header class="notification-history-header">
                        <span>"Notifications"</span>
                        <button
                            type="button"
                            class="notification-clear"
                            disabled=move || items.with(Vec::is_empty)
                            on:click=move |_| runtime.update_tray(NotificationTray::clear_all)
                        >
                            "Clear all"
                        </button>
                    </header>
                    <Show
                        when=move || items.with(|items| !items.is_empty())
                        fallback=|| view! { <p class="notification-empty">"No notifications"</p> }
                    >
                        <ul class="notification-list">
                            <For
                                each=move || items.get().into_iter().rev()
                                key=|notification| notification.id
                                let:notification
                            >
                                <NotificationEntry runtime notification />
                            </For>
                        </ul>
                    </Show>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn NotificationPopup(runtime: DesktopRuntime, notification: Notification) -> impl IntoView {
    view! {
        <div
            class="notification-popup"
            role="status"
            aria-live="polite"
            on:click=move |_| runtime.update_tray(NotificationTray::click_popup)
        >
            <strong class="notification-title">{notification.title}</strong>
            <p class="notification-message">{notification.message}</p>
            <button
                type="button"
                class="notification-dismiss"
                aria-label="Dismiss notification"
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    runtime.update_tray(NotificationTray::dismiss_popup);
                }
            >
                "×"
            </button>
        </div>
    }
}

#[component]
fn NotificationEntry(runtime: DesktopRuntime, notification: Notification) -> impl IntoView {
    let id = notification.id;
    view! {
        <li class="notification-entry">
            <strong class="notification-title">{notification.title}</strong>
            <p class="notification-message">{notification.message}</p>
            <button
                type="button"
                class="notification-dismiss"
                aria-label="Remove notification"
                on:click=move |_| runtime.update_tray(move |tray| tray.dismiss(id))
            >
                "×"
            </button>
        </li>
    }
}
