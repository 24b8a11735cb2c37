use dioxus::prelude::*;

use crate::domain::entities::notification::{NoticeLevel, NotificationCenter};

pub fn toast_style(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "background: #dcfce7; color: #166534; border: 1px solid #86efac; padding: 8px 12px; border-radius: 8px; display: flex; gap: 12px; align-items: center;",
        NoticeLevel::Error => "background: #fee2e2; color: #991b1b; border: 1px solid #fca5a5; padding: 8px 12px; border-radius: 8px; display: flex; gap: 12px; align-items: center;",
    }
}

#[component]
pub fn Toasts(mut notifications: Signal<NotificationCenter>) -> Element {
    let items = notifications.read().items().to_vec();

    rsx! {
        div { style: "position: fixed; right: 16px; bottom: 16px; display: flex; flex-direction: column; gap: 8px; z-index: 1400; max-width: 360px;",
            {items.into_iter().map(|(id, notification)| {
                rsx!(
                    div { key: "{id}", style: "{toast_style(notification.level)}",
                        span { style: "flex: 1;", "{notification.message}" }
                        button {
                            style: "border: none; background: transparent; cursor: pointer; color: inherit;",
                            onclick: move |_| notifications.write().dismiss(id),
                            "✕"
                        }
                    }
                )
            })}
        }
    }
}
