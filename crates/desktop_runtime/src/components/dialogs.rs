use leptos::*;

use super::a11y::focus_element_by_id;
use crate::runtime_context::DesktopRuntime;

const INPUT_FIELD_ID: &str = "input-dialog-field";

fn dialog_button_id(index: usize) -> String {
    format!("message-box-button-{index}")
}

#[component]
/// Modal overlay for the active message box or input dialog.
///
/// Keyboard input goes to whichever dialog is open while the overlay blocks the desktop behind it.
pub fn DialogLayer(runtime: DesktopRuntime) -> impl IntoView {
    let key_listener = window_event_listener(ev::keydown, move |ev| {
        let open = runtime.with_dialogs_untracked(|dialogs| {
            dialogs.message_box().is_some() || dialogs.input_dialog().is_some()
        });
        if ev.default_prevented() || !open {
            return;
        }
        let key = ev.key();
        let shift = ev.shift_key();
        let handled = runtime.update_dialogs(|dialogs| {
            if dialogs.message_box().is_some() {
                dialogs.message_box_key(&key, shift)
            } else {
                dialogs.input_key(&key)
            }
        });
        if handled {
            ev.prevent_default();
            ev.stop_propagation();
        }
    });
    on_cleanup(move || key_listener.remove());

    let focused_button = create_memo(move |_| {
        runtime.with_dialogs(|dialogs| dialogs.message_box().map(|active| active.focused))
    });
    let active_message = create_memo(move |_| {
        runtime.with_dialogs(|dialogs| dialogs.message_box().map(|active| active.request.clone()))
    });
    create_effect(move |_| {
        active_message.track();
        if let Some(index) = focused_button.get() {
            request_animation_frame(move || {
                let _ = focus_element_by_id(&dialog_button_id(index));
            });
        }
    });

    let active_input = create_memo(move |_| {
        runtime.with_dialogs(|dialogs| {
            dialogs.input_dialog().map(|active| {
                (active.serial, active.request.title.clone(), active.request.message.clone())
            })
        })
    });

    view! {
        {move || {
            active_input
                .get()
                .map(|(_, title, message)| view! { <InputDialogView runtime title message /> })
        }}
        {move || active_message.get().map(|request| {
                let class = format!("dialog message-box {}", request.kind.css_class());
                let buttons = request
                    .buttons
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(index, label)| {
                        view! {
                            <button
                                id=dialog_button_id(index)
                                class="dialog-button"
                                class:focused=move || focused_button.get() == Some(index)
                                type="button"
                                on:click=move |_| runtime.update_dialogs(|dialogs| dialogs.choose_button(index))
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect_view();
                view! {
                    <div class="modal-backdrop">
                        <div class=class role="alertdialog" aria-modal="true" aria-label=request.title.clone()>
                            <header class="dialog-title">{request.title}</header>
                            <p class="dialog-message">{request.message}</p>
                            <div class="dialog-buttons">{buttons}</div>
                        </div>
                    </div>
                }
            })}
    }
}

#[component]
fn InputDialogView(runtime: DesktopRuntime, title: String, message: String) -> impl IntoView {
    let value = runtime.with_dialogs_untracked(|dialogs| {
        dialogs
            .input_dialog()
            .map(|active| active.value.clone())
            .unwrap_or_default()
    });
    let error = create_memo(move |_| {
        runtime.with_dialogs(|dialogs| dialogs.input_dialog().and_then(|active| active.error.clone()))
    });
    request_animation_frame(|| {
        let _ = focus_element_by_id(INPUT_FIELD_ID);
    });

    view! {
        <div class="modal-backdrop">
            <div class="dialog input-dialog" role="dialog" aria-modal="true" aria-label=title.clone()>
                <header class="dialog-title">{title}</header>
                <label class="dialog-message" for=INPUT_FIELD_ID>{message}</label>
                <input
                    id=INPUT_FIELD_ID
                    class="dialog-input"
                    type="text"
                    value=value
                    aria-invalid=move || error.with(Option::is_some).to_string()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        runtime.update_dialogs(|dialogs| dialogs.set_input_value(value));
                    }
                />
                {move || error.get().map(|error| view! { <p class="dialog-error" role="alert">{error}</p> })}
                <div class="dialog-buttons">
                    <button
                        class="dialog-button"
                        type="button"
                        on:click=move |_| {
                            runtime.update_dialogs(|dialogs| dialogs.submit_input());
                        }
                    >
                        "OK"
                    </button>
                    <button
                        class="dialog-button"
                        type="button"
                        on:click=move |_| runtime.update_dialogs(|dialogs| dialogs.cancel_input())
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </div>
    }
}
