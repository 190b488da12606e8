use dioxus::prelude::*;

/// User picture with an initials fallback.
#[component]
pub fn Avatar(
    src: Option<String>,
    name: String,
    #[props(default)] class: String,
) -> Element {
    let initials = store::models::initials(&name);
    rsx! {
        span {
            class: "avatar {class}",
            if let Some(src) = src.filter(|s| !s.is_empty()) {
                img { class: "avatar-image", src: "{src}", alt: "{name}" }
            } else {
                span { class: "avatar-fallback", "{initials}" }
            }
        }
    }
}
