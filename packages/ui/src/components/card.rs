use dioxus::prelude::*;

#[component]
pub fn Card(
    #[props(default)] title: String,
    #[props(default)] description: String,
    #[props(default)] class: String,
    children: Element,
) -> Element {
    rsx! {
        section {
            class: "card {class}",
            if !title.is_empty() {
                header {
                    class: "card-header",
                    h2 { class: "card-title", "{title}" }
                    if !description.is_empty() {
                        p { class: "card-description", "{description}" }
                    }
                }
            }
            div { class: "card-content", {children} }
        }
    }
}

/// Placeholder block shown while content loads.
#[component]
pub fn Skeleton(#[props(default)] class: String) -> Element {
    rsx! {
        div { class: "skeleton {class}", aria_hidden: true }
    }
}
