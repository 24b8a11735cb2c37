use dioxus::prelude::*;

#[component]
pub fn ConfirmModal(
    title: String,
    message: String,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1300;",
            onclick: move |_| {
                if !busy {
                    on_cancel.call(());
                }
            },
            div {
                style: "background: #fff; color: #111827; padding: 16px; border: 1px solid #999; border-radius: 8px; min-width: 320px; max-width: 480px;",
                onclick: move |event| event.stop_propagation(),
                div { style: "margin-bottom: 8px; font-weight: 600;", "{title}" }
                p { style: "margin: 0 0 16px 0;", "{message}" }
                div { style: "display: flex; justify-content: flex-end; gap: 8px;",
                    button {
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        style: "background: #dc2626; color: #fff; border: none; padding: 4px 12px; border-radius: 6px;",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        if busy { "Deleting..." } else { "Delete" }
                    }
                }
            }
        }
    }
}
