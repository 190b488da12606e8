use dioxus::prelude::*;
use store::routes;

/// Unknown paths go back to `/`, which then picks the right landing page.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    use_effect(move || {
        tracing::debug!(path = %segments.join("/"), "unknown route");
        nav.replace(routes::HOME);
    });
    rsx! {}
}
