//! Transient toast notifications.
//!
//! Dismiss timers belong to the [`ToastProvider`], so a toast raised by a
//! component that unmounts right after (a sign-out redirect, say) still expires.

use dioxus::core::{current_scope_id, Runtime};
use dioxus::prelude::*;

use crate::platform;

const DISMISS_AFTER_MS: u64 = 4_000;
const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    fn class(&self) -> &'static str {
        match self {
            ToastLevel::Info => "toast toast-info",
            ToastLevel::Success => "toast toast-success",
            ToastLevel::Warning => "toast toast-warning",
            ToastLevel::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub timestamp: String,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    /// Appends a toast, dropping the oldest beyond the visible limit.
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>, timestamp: String) -> u64 {
        self.next_id += 1;
        self.entries.push(Toast {
            id: self.next_id,
            timestamp,
            level,
            message: message.into(),
        });
        if self.entries.len() > MAX_VISIBLE {
            let excess = self.entries.len() - MAX_VISIBLE;
            self.entries.drain(..excess);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|t| t.id != id);
    }
}

/// Handle for raising toasts from hooks and event handlers.
#[derive(Clone, Copy, PartialEq)]
pub struct Notifier {
    queue: Signal<ToastQueue>,
    owner: ScopeId,
}

impl Notifier {
    pub fn notify(&self, level: ToastLevel, message: impl Into<String>) {
        let mut queue = self.queue;
        let id = queue.write().push(level, message, platform::clock_time());
        Runtime::current().in_scope(self.owner, || {
            spawn(async move {
                platform::sleep_ms(DISMISS_AFTER_MS).await;
                queue.write().dismiss(id);
            })
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Error, message);
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<Toast> {
        self.queue.peek().entries.clone()
    }
}

pub fn use_notifications() -> Notifier {
    use_context::<Notifier>()
}

/// Provides the toast queue and renders it above `children`.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let queue = use_signal(ToastQueue::default);
    use_context_provider(|| Notifier {
        queue,
        owner: current_scope_id(),
    });

    rsx! {
        {children}
        ToastStack { queue }
    }
}

#[component]
fn ToastStack(queue: Signal<ToastQueue>) -> Element {
    rsx! {
        div {
            class: "toast-stack",
            aria_live: "polite",
            for toast in queue.read().entries.iter().cloned() {
                div {
                    key: "{toast.id}",
                    class: toast.level.class(),
                    role: if toast.level == ToastLevel::Error { "alert" } else { "status" },
                    span { class: "toast-message", "{toast.message}" }
                    span { class: "toast-time", "{toast.timestamp}" }
                    button {
                        class: "toast-close",
                        onclick: move |_| queue.write().dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::core::{NoOpMutations, VirtualDom};
    use std::cell::Cell;
    use std::time::Duration;

    thread_local! {
        static NOTIFIER: Cell<Option<Notifier>> = const { Cell::new(None) };
        static SHOW_RAISER: Cell<Option<Signal<bool>>> = const { Cell::new(None) };
    }

    #[component]
    fn Page() -> Element {
        let show = use_signal(|| true);
        SHOW_RAISER.with(|s| s.set(Some(show)));
        rsx! {
            ToastProvider {
                if show() {
                    Raiser {}
                }
            }
        }
    }

    /// Raises one toast once mounted.
    #[component]
    fn Raiser() -> Element {
        let notifier = use_notifications();
        NOTIFIER.with(|n| n.set(Some(notifier)));
        use_effect(move || notifier.info("saved"));
        rsx! {}
    }

    async fn settle(dom: &mut VirtualDom) {
        for _ in 0..3 {
            tokio::select! {
                _ = dom.wait_for_work() => {}
                _ = tokio::time::sleep(Duration::from_millis(1)) => {}
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    fn visible(dom: &VirtualDom) -> usize {
        let notifier = NOTIFIER.with(Cell::get).expect("raiser mounted");
        dom.in_runtime(|| notifier.entries().len())
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_raiser_unmounts() {
        let mut dom = VirtualDom::new(Page);
        dom.rebuild_in_place();
        settle(&mut dom).await;
        assert_eq!(visible(&dom), 1);

        let mut show = SHOW_RAISER.with(Cell::get).expect("page rendered");
        dom.in_runtime(|| show.set(false));
        settle(&mut dom).await;
        assert_eq!(visible(&dom), 1);

        tokio::time::sleep(Duration::from_millis(DISMISS_AFTER_MS + 10)).await;
        settle(&mut dom).await;
        assert_eq!(visible(&dom), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_stays_until_timer_fires() {
        let mut dom = VirtualDom::new(Page);
        dom.rebuild_in_place();
        settle(&mut dom).await;

        tokio::time::sleep(Duration::from_millis(DISMISS_AFTER_MS / 2)).await;
        settle(&mut dom).await;
        assert_eq!(visible(&dom), 1);

        tokio::time::sleep(Duration::from_millis(DISMISS_AFTER_MS)).await;
        settle(&mut dom).await;
        assert_eq!(visible(&dom), 0);
    }

    #[test]
    fn test_push_and_dismiss() {
        let mut queue = ToastQueue::default();
        let a = queue.push(ToastLevel::Info, "a", "10:00:00".into());
        let b = queue.push(ToastLevel::Error, "b", "10:00:01".into());
        assert_ne!(a, b);

        queue.dismiss(a);
        assert_eq!(queue.entries.len(), 1);
        assert_eq!(queue.entries[0].message, "b");

        queue.dismiss(a);
        assert_eq!(queue.entries.len(), 1);
    }

    #[test]
    fn test_oldest_dropped_beyond_limit() {
        let mut queue = ToastQueue::default();
        for i in 0..(MAX_VISIBLE + 2) {
            queue.push(ToastLevel::Info, format!("m{i}"), String::new());
        }
        assert_eq!(queue.entries.len(), MAX_VISIBLE);
        assert_eq!(queue.entries[0].message, "m2");
    }
}
