use leptos::*;
use wasm_bindgen::JsCast;

use super::{pointer_from_pointer_event, stop_mouse_event};
use crate::{
    context_menu::MenuContext,
    frame::{frame_view, resize_edge_class, FrameView, TitleBarControl},
    model::{Position, ResizeEdge, WindowId, WindowRecord},
    reducer::DesktopAction,
    runtime_context::DesktopRuntime,
};

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_button(ev: &web_sys::PointerEvent) -> bool {
    ev.is_primary() && ev.button() == 0
}

/// Title bar clicks on the control buttons must not start a drag.
fn from_titlebar_control(ev: &web_sys::PointerEvent) -> bool {
    ev.target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(".titlebar-controls").ok().flatten())
        .is_some()
}

#[component]
/// One window frame. Geometry, stacking, and state classes follow the runtime reactively; the
/// content view is created once for the lifetime of the window.
pub fn DesktopWindow(runtime: DesktopRuntime, window_id: WindowId) -> impl IntoView {
    let window_id = store_value(window_id);
    let frame = create_memo(move |_| {
        runtime
            .state
            .with(|state| window_id.with_value(|id| frame_view(state, id)))
    });
    let read = move |f: fn(&FrameView) -> String| {
        frame.with(|frame| frame.as_ref().map(f).unwrap_or_default())
    };

    let focus = move |_: web_sys::PointerEvent| {
        if frame.with_untracked(|frame| frame.as_ref().is_some_and(|frame| !frame.active)) {
            runtime.dispatch_action(DesktopAction::FocusWindow {
                window_id: window_id.get_value(),
            });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_button(&ev) || from_titlebar_control(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id: window_id.get_value(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let toggle_maximize = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id: window_id.get_value(),
        });
    };
    let open_menu = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.open_menu(
            MenuContext::Window(window_id.get_value()),
            Position::new(ev.client_x(), ev.client_y()),
        );
    };
    let on_control = Callback::new(move |control: TitleBarControl| {
        if let Some(frame) = frame.get_untracked() {
            runtime.dispatch_action(control.action(&frame));
        }
    });

    let content = runtime
        .state
        .with_untracked(|state| window_id.with_value(|id| state.window(id).cloned()))
        .map(|record| {
            runtime
                .render_content(&record)
                .unwrap_or_else(|| missing_content(&record))
        });

    view! {
        <section
            id=move || read(FrameView::dom_id)
            class=move || read(FrameView::class)
            style=move || read(FrameView::style)
            role="dialog"
            aria-label=move || read(|frame| frame.title.clone())
            on:pointerdown=focus
            on:contextmenu=|ev: web_sys::MouseEvent| ev.stop_propagation()
        >
            <header
                class="titlebar"
                on:pointerdown=begin_move
                on:dblclick=toggle_maximize
                on:contextmenu=open_menu
            >
                <span class="titlebar-title">{move || read(|frame| frame.title.clone())}</span>
                <div class="titlebar-controls">
                    {TitleBarControl::ALL
                        .into_iter()
                        .map(|control| view! { <TitleBarButton frame control on_press=on_control /> })
                        .collect_view()}
                </div>
            </header>
            <div class="window-body">{content}</div>
            <Show when=move || frame.with(|frame| frame.as_ref().is_some_and(FrameView::resizable))>
                {ResizeEdge::ALL
                    .into_iter()
                    .map(|edge| {
                        view! { <WindowResizeHandle runtime window_id=window_id.get_value() edge /> }
                    })
                    .collect_view()}
            </Show>
        </section>
    }
}

#[component]
fn TitleBarButton(
    frame: Memo<Option<FrameView>>,
    control: TitleBarControl,
    on_press: Callback<TitleBarControl>,
) -> impl IntoView {
    let label = move || {
        frame.with(|frame| frame.as_ref().map(|f| control.aria_label(f)).unwrap_or_default())
    };
    let glyph =
        move || frame.with(|frame| frame.as_ref().map(|f| control.glyph(f)).unwrap_or_default());

    view! {
        <button
            class="titlebar-button"
            type="button"
            aria-label=label
            title=label
            on:click=move |ev| {
                stop_mouse_event(&ev);
                on_press.call(control);
            }
        >
            {glyph}
        </button>
    }
}

#[component]
fn WindowResizeHandle(runtime: DesktopRuntime, window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let class = format!("window-resize-handle {}", resize_edge_class(edge));
    let begin_resize = move |ev: web_sys::PointerEvent| {
        if !is_primary_button(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id: window_id.clone(),
            edge,
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! { <div class=class aria-hidden="true" on:pointerdown=begin_resize></div> }
}

fn missing_content(record: &WindowRecord) -> View {
    view! {
        <div class="window-placeholder" role="note">
            <p>{format!("Nothing is registered to display \"{}\".", record.component)}</p>
        </div>
    }
    .into_view()
}
