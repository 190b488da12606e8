//! Authentication context and hooks for the UI.

use dioxus::prelude::*;
use store::session::run_session;
use store::{profile, routes, AuthBackend, AuthEventKind, SessionState};

use crate::backend::{use_backend, Backend};
use crate::i18n::{use_i18n, I18n};
use crate::notifications::{use_notifications, Notifier};

/// Set once a password-recovery link has been followed in this tab.
#[derive(Clone, Copy, PartialEq)]
pub struct RecoverySignal(pub Signal<bool>);

/// Get the current session state.
/// Returns a signal that updates on every auth event.
pub fn use_auth() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_password_recovery() -> Signal<bool> {
    use_context::<RecoverySignal>().0
}

/// Provider component that owns the session state.
///
/// The session driver runs for as long as the provider is mounted; unmounting
/// drops it together with its auth-event subscription.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_backend();
    let mut state = use_signal(SessionState::default);
    let mut recovery = use_signal(|| false);

    let watcher = backend.clone();
    use_future(move || {
        let backend = watcher.clone();
        async move {
            let mut events = backend.subscribe();
            while let Some(event) = events.next().await {
                if event.kind == AuthEventKind::PasswordRecovery {
                    tracing::info!("password recovery link detected");
                    recovery.set(true);
                }
            }
        }
    });

    use_future(move || {
        let backend = backend.clone();
        async move {
            run_session(&backend, |next| state.set(next)).await;
        }
    });

    use_context_provider(|| state);
    use_context_provider(|| RecoverySignal(recovery));

    rsx! {
        {children}
    }
}

/// The one sign-out path of the dashboard, shared by the sidebar and the
/// profile page.
#[derive(Clone, Copy, PartialEq)]
pub struct SignOut {
    backend: Signal<Backend>,
    i18n: I18n,
    notifier: Notifier,
}

pub fn use_sign_out() -> SignOut {
    let backend = use_backend();
    SignOut {
        backend: use_signal(move || backend),
        i18n: use_i18n(),
        notifier: use_notifications(),
    }
}

impl SignOut {
    /// Signs out, then goes to sign-in with a notice. On failure the user
    /// stays put and sees the backend's message.
    pub fn run(&self) {
        let this = *self;
        spawn(async move {
            let backend = this.backend.peek().clone();
            match profile::sign_out(&backend).await {
                Ok(()) => {
                    navigator().push(routes::SIGNIN);
                    this.notifier.info(this.i18n.t("auth.signOutSuccess"));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "sign out failed");
                    let message = err
                        .backend_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| this.i18n.t(err.message_key("auth.signOutError")));
                    this.notifier.error(message);
                }
            }
        });
    }
}
