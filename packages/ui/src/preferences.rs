//! Hook over the signed-in user's persisted preferences.

use dioxus::prelude::*;
use store::preferences::{load_or_create, update_preferences};
use store::{BackendError, PreferencesUpdate, UserPreferences};

use crate::auth::use_auth;
use crate::backend::{use_backend, Backend};
use crate::busy::BusyFlag;

#[derive(Clone, Copy)]
pub struct PreferencesHandle {
    pub preferences: Signal<Option<UserPreferences>>,
    pub loading: Signal<bool>,
    pub saving: Signal<bool>,
    user_id: Memo<Option<String>>,
    backend: Signal<Backend>,
}

/// Loads (or lazily creates) the preferences row whenever the user changes.
pub fn use_user_preferences() -> PreferencesHandle {
    let auth = use_auth();
    let backend = use_backend();
    let user_id = use_memo(move || auth.read().user_id().map(str::to_string));
    let mut preferences = use_signal(|| None);
    let mut loading = use_signal(|| true);
    let backend = use_signal(move || backend);

    use_resource(move || async move {
        let id = user_id();
        loading.set(true);
        let client = backend.peek().clone();
        preferences.set(load_or_create(&client, id.as_deref()).await);
        loading.set(false);
    });

    PreferencesHandle {
        preferences,
        loading,
        saving: use_signal(|| false),
        user_id,
        backend,
    }
}

impl PreferencesHandle {
    /// Persists `changes`. Without a user or loaded preferences nothing is sent.
    pub async fn update(&self, changes: PreferencesUpdate) -> Result<(), BackendError> {
        let mut preferences = self.preferences;
        let client = self.backend.peek().clone();
        let user_id = self.user_id.peek().clone();
        let current = preferences.peek().clone();

        let _busy = BusyFlag::raise(self.saving);
        if let Some(updated) = update_preferences(&client, user_id.as_deref(), current.as_ref(), changes).await? {
            tracing::info!(currency = updated.currency.code(), language = updated.language.code(), "preferences saved");
            preferences.set(Some(updated));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{BackendConfig, HostedBackend};
    use dioxus::core::{current_scope_id, NoOpMutations, VirtualDom};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use store::{Language, SessionState, User};

    thread_local! {
        static HANDLE: Cell<Option<(PreferencesHandle, ScopeId)>> = const { Cell::new(None) };
        static OUTCOME: RefCell<Option<Result<(), BackendError>>> = const { RefCell::new(None) };
    }

    #[component]
    fn Root() -> Element {
        // Nothing listens on port 9, so every request is refused.
        use_context_provider(|| HostedBackend::new(BackendConfig::new("http://127.0.0.1:9", "k")));
        use_context_provider(|| {
            Signal::new(SessionState {
                user: Some(User {
                    id: "u1".to_string(),
                    email: None,
                    user_metadata: Default::default(),
                }),
                loading: false,
            })
        });
        let handle = use_user_preferences();
        HANDLE.with(|h| h.set(Some((handle, current_scope_id()))));
        rsx! {}
    }

    async fn run_until(dom: &mut VirtualDom, done: impl Fn(&VirtualDom) -> bool) {
        for _ in 0..400 {
            if done(dom) {
                return;
            }
            tokio::select! {
                _ = dom.wait_for_work() => {}
                _ = tokio::time::sleep(Duration::from_millis(5)) => {}
            }
            dom.render_immediate(&mut NoOpMutations);
        }
        panic!("dom never reached the expected state");
    }

    #[tokio::test]
    async fn test_failed_update_lowers_saving_flag() {
        let mut dom = VirtualDom::new(Root);
        dom.rebuild_in_place();
        let (handle, scope) = HANDLE.with(Cell::get).expect("root rendered");
        run_until(&mut dom, |dom| !dom.in_runtime(|| *handle.loading.peek())).await;
        assert!(dom.in_runtime(|| handle.preferences.peek().is_none()));

        dom.in_scope(scope, || {
            let mut preferences = handle.preferences;
            preferences.set(Some(UserPreferences::defaults_for("u1", chrono::Utc::now())));
            spawn(async move {
                let outcome = handle.update(PreferencesUpdate::language(Language::En)).await;
                OUTCOME.with(|o| *o.borrow_mut() = Some(outcome));
            });
        });
        run_until(&mut dom, |_| OUTCOME.with(|o| o.borrow().is_some())).await;

        assert!(OUTCOME.with(|o| matches!(*o.borrow(), Some(Err(_)))));
        assert!(!dom.in_runtime(|| *handle.saving.peek()));
        let language = dom.in_runtime(|| handle.preferences.peek().as_ref().map(|p| p.language));
        assert_eq!(language, Some(Language::Fr));
    }
}
