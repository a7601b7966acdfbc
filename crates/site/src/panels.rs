//! Window content for the site build. Marketplace features plug in here; the panels only show
//! the window manager contract (opening windows, dialogs, notifications) in use.

use desktop_runtime::{
    route_table, DesktopAction, DesktopRuntime, InputDialogRequest, MessageBoxRequest,
    MessageKind, WindowRecord,
};
use leptos::*;

pub(crate) fn register_panels(runtime: DesktopRuntime) {
    for route in route_table() {
        runtime.register_content(route.component, move |window| market_panel(runtime, window));
    }
    runtime.register_content("Settings", move |_| settings_panel(runtime));
}

fn market_panel(runtime: DesktopRuntime, window: &WindowRecord) -> View {
    let heading = window.title.clone();
    let watched = window.title.clone();
    let blurb = format!("{} content is provided by the marketplace application.", window.component);

    view! {
        <div class="market-panel">
            <h2>{heading}</h2>
            <p>{blurb}</p>
            <div class="market-panel-actions">
                <button
                    type="button"
                    on:click=move |_| {
                        runtime.open_window("messages", "Messages", "Messages", true);
                    }
                >
                    "Message seller"
                </button>
                <button
                    type="button"
                    on:click=move |_| runtime.notify(watched.clone(), "Added to your watchlist.", true)
                >
                    "Watch"
                </button>
            </div>
        </div>
    }
    .into_view()
}

fn settings_panel(runtime: DesktopRuntime) -> View {
    let summary = move || {
        runtime.state.with(|state| {
            format!(
                "{} open windows, notifications close after {} ms",
                state.windows.len(),
                state.config.notification_auto_close_ms
            )
        })
    };

    let close_others = move |_| {
        let response = runtime.show_message_box(
            MessageBoxRequest::new("Close windows", "Close every window except Settings?")
                .kind(MessageKind::Question)
                .buttons(["Close", "Cancel"]),
        );
        spawn_local(async move {
            if response.await.as_deref() != Some("Close") {
                return;
            }
            let others: Vec<_> = runtime.state.with_untracked(|state| {
                state
                    .windows
                    .iter()
                    .filter(|window| window.component != "Settings")
                    .map(|window| window.id.clone())
                    .collect()
            });
            for window_id in others {
                runtime.dispatch_action(DesktopAction::CloseWindow { window_id });
            }
        });
    };

    let rename = move |_| {
        let response = runtime.show_input_dialog(
            InputDialogRequest::new("Display name", "Name shown to buyers and sellers")
                .validator(|value| {
                    if value.trim().is_empty() {
                        Err("Enter a name.".to_string())
                    } else {
                        Ok(())
                    }
                }),
        );
        spawn_local(async move {
            if let Some(name) = response.await {
                runtime.notify("Profile updated", format!("Display name set to {}.", name.trim()), true);
            }
        });
    };

    view! {
        <div class="settings-panel">
            <h2>"Settings"</h2>
            <p>{summary}</p>
            <div class="market-panel-actions">
                <button type="button" on:click=rename>"Change display name"</button>
                <button type="button" on:click=close_others>"Close other windows"</button>
                <button
                    type="button"
                    on:click=move |_| runtime.notify("Test", "Notifications are working.", true)
                >
                    "Send test notification"
                </button>
            </div>
        </div>
    }
    .into_view()
}
