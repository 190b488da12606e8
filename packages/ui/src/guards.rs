//! Route gates over the session state.

use dioxus::prelude::*;
use store::guard::home_redirect;
use store::{Guard, GuardDecision};

use crate::auth::use_auth;
use crate::i18n::use_i18n;

/// Full-page busy indicator shown while the session resolves.
#[component]
pub fn BusyScreen() -> Element {
    let i18n = use_i18n();
    rsx! {
        div {
            class: "busy-screen",
            role: "status",
            div { class: "spinner" }
            span { class: "sr-only", {i18n.t("common.loading")} }
        }
    }
}

/// Renders `children` only when `guard` allows it, redirecting otherwise.
/// Never redirects while the session is still loading.
#[component]
fn Gate(guard: Guard, children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if let GuardDecision::Redirect(to) = guard.decide(&auth.read()) {
            tracing::debug!(?guard, to, "guard redirect");
            nav.replace(to);
        }
    });

    let decision = guard.decide(&auth.read());
    match decision {
        GuardDecision::Render => rsx! {
            {children}
        },
        GuardDecision::Busy | GuardDecision::Redirect(_) => rsx! {
            BusyScreen {}
        },
    }
}

/// Only for signed-in users; others are sent to sign-in.
#[component]
pub fn PrivateRoute(children: Element) -> Element {
    rsx! {
        Gate { guard: Guard::Private, {children} }
    }
}

/// Only for anonymous users; signed-in users are sent to the dashboard.
#[component]
pub fn PublicRoute(children: Element) -> Element {
    rsx! {
        Gate { guard: Guard::Public, {children} }
    }
}

/// `/`: waits for the session, then redirects to the dashboard or sign-in.
#[component]
pub fn HomeRedirect() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if let GuardDecision::Redirect(to) = home_redirect(&auth.read()) {
            nav.replace(to);
        }
    });

    rsx! {
        BusyScreen {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::core::{NoOpMutations, VirtualDom};
    use std::cell::Cell;
    use std::time::Duration;
    use store::{SessionState, User};

    thread_local! {
        static AUTH: Cell<Option<Signal<SessionState>>> = const { Cell::new(None) };
        static SECRET_SHOWN: Cell<bool> = const { Cell::new(false) };
        static SIGNIN_SHOWN: Cell<bool> = const { Cell::new(false) };
    }

    #[derive(Routable, Clone, PartialEq, Debug)]
    enum Page {
        #[route("/")]
        Guarded {},
        #[route("/signin")]
        SignInPage {},
    }

    #[component]
    fn Guarded() -> Element {
        rsx! {
            PrivateRoute { Secret {} }
        }
    }

    #[component]
    fn Secret() -> Element {
        SECRET_SHOWN.with(|s| s.set(true));
        rsx! {}
    }

    #[component]
    fn SignInPage() -> Element {
        SIGNIN_SHOWN.with(|s| s.set(true));
        rsx! {}
    }

    #[component]
    fn Root() -> Element {
        let auth = use_context_provider(|| Signal::new(SessionState::default()));
        AUTH.with(|a| a.set(Some(auth)));
        crate::i18n::use_i18n_provider();
        rsx! {
            Router::<Page> {}
        }
    }

    async fn settle(dom: &mut VirtualDom) {
        for _ in 0..3 {
            tokio::select! {
                _ = dom.wait_for_work() => {}
                _ = tokio::time::sleep(Duration::from_millis(5)) => {}
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    async fn resolve(dom: &mut VirtualDom, user: Option<User>) {
        let mut auth = AUTH.with(Cell::get).expect("root rendered");
        dom.in_runtime(|| auth.set(SessionState { user, loading: false }));
        settle(dom).await;
    }

    #[tokio::test]
    async fn test_private_gate_waits_then_redirects_anonymous() {
        let mut dom = VirtualDom::new(Root);
        dom.rebuild_in_place();
        settle(&mut dom).await;
        assert!(!SECRET_SHOWN.with(Cell::get));
        assert!(!SIGNIN_SHOWN.with(Cell::get));

        resolve(&mut dom, None).await;
        assert!(SIGNIN_SHOWN.with(Cell::get));
        assert!(!SECRET_SHOWN.with(Cell::get));
    }

    #[tokio::test]
    async fn test_private_gate_renders_for_signed_in_user() {
        let mut dom = VirtualDom::new(Root);
        dom.rebuild_in_place();
        settle(&mut dom).await;

        let user = User {
            id: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
            user_metadata: Default::default(),
        };
        resolve(&mut dom, Some(user)).await;
        assert!(SECRET_SHOWN.with(Cell::get));
        assert!(!SIGNIN_SHOWN.with(Cell::get));
    }
}
