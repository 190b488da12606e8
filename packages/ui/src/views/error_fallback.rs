use dioxus::prelude::*;

use crate::components::{Button, Card};
use crate::i18n::use_i18n;

/// Shown by the top-level error boundary. Retry clears only the boundary's
/// own error; the rest of the app keeps its state.
#[component]
pub fn ErrorFallback(message: String, on_retry: Option<EventHandler<()>>) -> Element {
    let i18n = use_i18n();

    rsx! {
        div {
            class: "error-page",
            Card {
                title: i18n.t("errors.unexpected"),
                description: i18n.t("errors.unexpectedDescription"),
                pre { class: "error-details", "{message}" }
                if let Some(retry) = on_retry {
                    div {
                        class: "card-actions",
                        Button { onclick: move |_| retry.call(()), {i18n.t("common.retry")} }
                    }
                }
            }
        }
    }
}
