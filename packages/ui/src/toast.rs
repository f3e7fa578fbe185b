use std::time::Duration;

use api::{NoticeKind, Notifier};
use dioxus::prelude::*;

use crate::browser::sleep;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn push(&mut self, message: &str, kind: NoticeKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Toast {
            id,
            message: message.to_string(),
            kind,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|t| t.id != id);
    }
}

pub fn use_toasts() -> Signal<ToastQueue> {
    use_context::<Signal<ToastQueue>>()
}

/// [`Notifier`] that shows each notice as a toast and dismisses it after
/// [`TOAST_LIFETIME`].
#[derive(Clone, Copy)]
pub struct ToastNotifier {
    queue: Signal<ToastQueue>,
}

impl ToastNotifier {
    pub fn new(queue: Signal<ToastQueue>) -> Self {
        Self { queue }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => tracing::error!("{}", message),
            NoticeKind::Warning => tracing::warn!("{}", message),
            _ => tracing::info!("{}", message),
        }

        let mut queue = self.queue;
        let id = queue.write().push(message, kind);
        spawn(async move {
            sleep(TOAST_LIFETIME).await;
            queue.write().dismiss(id);
        });
    }
}

/// Renders the pending toasts. Mounted once by [`crate::SessionProvider`].
#[component]
pub fn ToastHost() -> Element {
    let mut queue = use_toasts();
    let toasts: Vec<(u64, String, String)> = queue()
        .entries
        .iter()
        .map(|t| (t.id, format!("toast toast-{}", t.kind.as_str()), t.message.clone()))
        .collect();

    rsx! {
        div {
            class: "toast-container",
            for (id, class, message) in toasts {
                div {
                    key: "{id}",
                    class: "{class}",
                    role: "status",
                    span { "{message}" }
                    button {
                        class: "toast-close",
                        onclick: move |_| queue.write().dismiss(id),
                        "×"
                    }
                }
            }
        }
    }
}
