use leptos::*;

use super::{a11y::focus_element_by_id, stop_mouse_event};
use crate::{
    context_menu::{ContextMenuState, MenuAction},
    runtime_context::DesktopRuntime,
};

fn item_dom_id(depth: usize, index: usize) -> String {
    format!("context-menu-item-{depth}-{index}")
}

#[component]
/// Cascading context menu overlay. Only one tree is open at a time.
///
/// `on_command` receives [`MenuAction::Command`] outcomes; without it they are logged.
pub fn ContextMenuLayer(
    runtime: DesktopRuntime,
    on_command: Option<Callback<String>>,
) -> impl IntoView {
    let run = Callback::new(move |action: MenuAction| {
        let Some(command) = runtime.run_menu_action(action) else {
            return;
        };
        match on_command {
            Some(on_command) => on_command.call(command),
            None => logging::log!("context menu command `{command}` has no handler"),
        }
    });

    let key_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || !runtime.menu.with_untracked(ContextMenuState::is_open) {
            return;
        }
        let mut outcome = (false, None);
        runtime
            .menu
            .update(|menu| outcome = menu.handle_key(&ev.key()));
        let (handled, action) = outcome;
        if handled {
            ev.prevent_default();
            ev.stop_propagation();
        }
        if let Some(action) = action {
            run.call(action);
        }
    });
    on_cleanup(move || key_listener.remove());

    let highlighted = create_memo(move |_| {
        runtime.menu.with(|menu| {
            menu.levels
                .iter()
                .enumerate()
                .rev()
                .find_map(|(depth, level)| level.highlighted.map(|index| (depth, index)))
        })
    });
    create_effect(move |_| {
        if let Some((depth, index)) = highlighted.get() {
            request_animation_frame(move || {
                let _ = focus_element_by_id(&item_dom_id(depth, index));
            });
        }
    });

    view! {
        <Show when=move || runtime.menu.with(ContextMenuState::is_open)>
            <div class="context-menu-layer">
                <For
                    each=move || 0..runtime.menu.with(ContextMenuState::depth)
                    key=|depth| *depth
                    let:depth
                >
                    <MenuLevelView runtime depth run />
                </For>
            </div>
        </Show>
    }
}

#[component]
fn MenuLevelView(runtime: DesktopRuntime, depth: usize, run: Callback<MenuAction>) -> impl IntoView {
    move || {
        let level = runtime.menu.with(|menu| menu.levels.get(depth).cloned())?;
        let size = level.size();
        let style = format!(
            "left:{}px;top:{}px;width:{}px;",
            level.position.x, level.position.y, size.width
        );
        let items = level
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let mut class = String::from("context-menu-item");
                if level.highlighted == Some(index) {
                    class.push_str(" highlighted");
                }
                if item.disabled {
                    class.push_str(" disabled");
                }
                let has_submenu = item.has_submenu();
                view! {
                    <button
                        id=item_dom_id(depth, index)
                        class=class
                        type="button"
                        role="menuitem"
                        tabindex="-1"
                        disabled=item.disabled
                        aria-disabled=item.disabled.to_string()
                        aria-haspopup=has_submenu.then_some("menu")
                        on:mouseenter=move |_| runtime.menu.update(|menu| menu.hover(depth, index))
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            let mut action = None;
                            runtime.menu.update(|menu| action = menu.activate(depth, index));
                            if let Some(action) = action {
                                run.call(action);
                            }
                        }
                    >
                        <span class="context-menu-label">{item.label}</span>
                        {has_submenu
                            .then(|| view! { <span class="context-menu-arrow" aria-hidden="true">"▸"</span> })}
                    </button>
                }
            })
            .collect_view();

        Some(view! {
            <div
                class="context-menu"
                role="menu"
                style=style
                on:mousedown=|ev: web_sys::MouseEvent| ev.stop_propagation()
                on:contextmenu=|ev: web_sys::MouseEvent| stop_mouse_event(&ev)
            >
                {items}
            </div>
        })
    }
}
