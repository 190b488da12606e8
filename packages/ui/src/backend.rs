//! The hosted backend client, shared through context.

use dioxus::prelude::*;

pub type Backend = api::HostedBackend;

/// Makes `backend` available to every descendant through [`use_backend`].
#[component]
pub fn BackendProvider(backend: Backend, children: Element) -> Element {
    use_context_provider(|| backend.clone());
    rsx! {
        {children}
    }
}

pub fn use_backend() -> Backend {
    use_context::<Backend>()
}
