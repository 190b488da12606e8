use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{Map, Value};

use crate::backend::{AuthBackend, PreferencesBackend, StorageBackend};
use crate::error::BackendError;
use crate::events::{AuthEvent, AuthEventBus, AuthEventKind, AuthSubscription};
use crate::models::{
    PreferencesUpdate, ProfileUpdate, Session, SignUpOutcome, User, UserPreferences,
};

/// A call received by [`MemoryBackend`], in arrival order. Passwords are never recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    SignUp { email: String },
    SignIn { email: String },
    SendPasswordReset { email: String, redirect_url: String },
    UpdatePassword,
    UpdateUser(ProfileUpdate),
    SignOut,
    GetSession,
    GetPreferences { user_id: String },
    CreatePreferences { user_id: String },
    UpdatePreferences { user_id: String, changes: PreferencesUpdate },
    Upload { bucket: String, path: String, content_type: String, size: usize },
    Remove { bucket: String, path: String },
}

impl BackendCall {
    fn op(&self) -> &'static str {
        match self {
            BackendCall::SignUp { .. } => "sign_up",
            BackendCall::SignIn { .. } => "sign_in",
            BackendCall::SendPasswordReset { .. } => "send_password_reset",
            BackendCall::UpdatePassword => "update_password",
            BackendCall::UpdateUser(_) => "update_user",
            BackendCall::SignOut => "sign_out",
            BackendCall::GetSession => "get_session",
            BackendCall::GetPreferences { .. } => "get_preferences",
            BackendCall::CreatePreferences { .. } => "create_preferences",
            BackendCall::UpdatePreferences { .. } => "update_preferences",
            BackendCall::Upload { .. } => "upload",
            BackendCall::Remove { .. } => "remove",
        }
    }
}

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    session: Option<Session>,
    preferences: HashMap<String, UserPreferences>,
    objects: HashMap<String, (String, Vec<u8>)>,
    calls: Vec<BackendCall>,
    failures: HashMap<&'static str, BackendError>,
    next_id: u64,
}

impl State {
    fn issue_session(&mut self, user: User) -> Session {
        self.next_id += 1;
        let now = Utc::now().timestamp();
        Session {
            access_token: format!("access-{}", self.next_id),
            refresh_token: format!("refresh-{}", self.next_id),
            expires_in: 3600,
            expires_at: Some(now + 3600),
            token_type: "bearer".to_string(),
            user,
        }
    }

    fn current_user_id(&self) -> Result<String, BackendError> {
        self.session
            .as_ref()
            .map(|s| s.user.id.clone())
            .ok_or_else(|| BackendError::with_status(401, "Auth session missing!"))
    }

    fn account_by_id(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.values_mut().find(|a| a.user.id == id)
    }
}

/// In-process backend for tests: accounts, one session, a preferences table and
/// an object store behind a mutex, plus a log of every call and one-shot failure
/// injection per operation.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    events: AuthEventBus,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records `call` and returns the injected failure for its operation, if any.
    fn begin(&self, call: BackendCall) -> Result<MutexGuard<'_, State>, BackendError> {
        let mut state = self.lock();
        let op = call.op();
        state.calls.push(call);
        let failure = state.failures.remove(op);
        match failure {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    /// Registers an account without going through `sign_up`.
    pub fn add_user(&self, email: &str, password: &str, full_name: &str) -> User {
        let mut state = self.lock();
        state.next_id += 1;
        let mut metadata = Map::new();
        metadata.insert("full_name".into(), Value::String(full_name.to_string()));
        let user = User {
            id: format!("user-{}", state.next_id),
            email: Some(email.to_string()),
            user_metadata: metadata,
        };
        state.accounts.insert(
            email.to_string(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }

    /// Installs a session for `user` silently, as if restored from storage.
    pub fn restore_session(&self, user: &User) -> Session {
        let mut state = self.lock();
        let session = state.issue_session(user.clone());
        state.session = Some(session.clone());
        session
    }

    /// Makes the next call of `op` (e.g. `"update_user"`) fail with `message`.
    pub fn fail_next(&self, op: &'static str, message: &str) {
        self.lock().failures.insert(op, BackendError::with_status(400, message));
    }

    pub fn fail_next_with(&self, op: &'static str, err: BackendError) {
        self.lock().failures.insert(op, err);
    }

    /// Pushes an event to subscribers as the backend would.
    pub fn emit(&self, event: AuthEvent) {
        self.events.emit(event);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn stored_object(&self, bucket: &str, path: &str) -> Option<(String, Vec<u8>)> {
        self.lock().objects.get(&format!("{bucket}/{path}")).cloned()
    }

    pub fn stored_preferences(&self, user_id: &str) -> Option<UserPreferences> {
        self.lock().preferences.get(user_id).cloned()
    }

    pub fn insert_preferences(&self, prefs: UserPreferences) {
        self.lock().preferences.insert(prefs.user_id.clone(), prefs);
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}

impl AuthBackend for MemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        {
            let state = self.begin(BackendCall::SignUp {
                email: email.to_string(),
            })?;
            if state.accounts.contains_key(email) {
                return Err(BackendError::with_status(422, "User already registered"));
            }
        }
        let user = self.add_user(email, password, full_name);
        Ok(SignUpOutcome {
            user: Some(user),
            session: None,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let session = {
            let mut state = self.begin(BackendCall::SignIn {
                email: email.to_string(),
            })?;
            let user = match state.accounts.get(email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(BackendError::with_status(400, "Invalid login credentials")),
            };
            let session = state.issue_session(user);
            state.session = Some(session.clone());
            session
        };
        self.events
            .emit(AuthEvent::new(AuthEventKind::SignedIn, Some(session.clone())));
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str, redirect_url: &str) -> Result<(), BackendError> {
        self.begin(BackendCall::SendPasswordReset {
            email: email.to_string(),
            redirect_url: redirect_url.to_string(),
        })?;
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<User, BackendError> {
        let (user, session) = {
            let mut state = self.begin(BackendCall::UpdatePassword)?;
            let id = state.current_user_id()?;
            let account = state
                .account_by_id(&id)
                .ok_or_else(|| BackendError::with_status(404, "User not found"))?;
            account.password = new_password.to_string();
            let user = account.user.clone();
            (user, state.session.clone())
        };
        self.events
            .emit(AuthEvent::new(AuthEventKind::UserUpdated, session));
        Ok(user)
    }

    async fn update_user(&self, update: &ProfileUpdate) -> Result<User, BackendError> {
        let (user, session) = {
            let mut state = self.begin(BackendCall::UpdateUser(update.clone()))?;
            let id = state.current_user_id()?;

            if let Some(email) = &update.email {
                if state.accounts.get(email).is_some_and(|a| a.user.id != id) {
                    return Err(BackendError::with_status(
                        422,
                        "A user with this email address has already been registered",
                    ));
                }
            }

            let old_email = state
                .account_by_id(&id)
                .and_then(|a| a.user.email.clone())
                .ok_or_else(|| BackendError::with_status(404, "User not found"))?;
            let mut account = state
                .accounts
                .remove(&old_email)
                .ok_or_else(|| BackendError::with_status(404, "User not found"))?;

            let metadata = &mut account.user.user_metadata;
            metadata.insert("full_name".into(), Value::String(update.data.full_name.clone()));
            metadata.insert("avatar_url".into(), Value::String(update.data.avatar_url.clone()));
            if let Some(email) = &update.email {
                account.user.email = Some(email.clone());
            }

            let user = account.user.clone();
            let key = user.email.clone().unwrap_or(old_email);
            state.accounts.insert(key, account);
            if let Some(session) = state.session.as_mut() {
                session.user = user.clone();
            }
            (user, state.session.clone())
        };
        self.events
            .emit(AuthEvent::new(AuthEventKind::UserUpdated, session));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        {
            let mut state = self.begin(BackendCall::SignOut)?;
            state.session = None;
        }
        self.events.emit(AuthEvent::signed_out());
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let state = self.begin(BackendCall::GetSession)?;
        Ok(state.session.clone())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}

impl PreferencesBackend for MemoryBackend {
    async fn get_preferences(&self, user_id: &str) -> Result<UserPreferences, BackendError> {
        let state = self.begin(BackendCall::GetPreferences {
            user_id: user_id.to_string(),
        })?;
        state.preferences.get(user_id).cloned().ok_or_else(|| {
            BackendError::with_status(406, "JSON object requested, multiple (or no) rows returned")
        })
    }

    async fn create_preferences(&self, user_id: &str) -> Result<UserPreferences, BackendError> {
        let mut state = self.begin(BackendCall::CreatePreferences {
            user_id: user_id.to_string(),
        })?;
        if state.preferences.contains_key(user_id) {
            return Err(BackendError::with_status(
                409,
                "duplicate key value violates unique constraint \"user_preferences_pkey\"",
            ));
        }
        let prefs = UserPreferences::defaults_for(user_id, Utc::now());
        state.preferences.insert(user_id.to_string(), prefs.clone());
        Ok(prefs)
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        changes: &PreferencesUpdate,
    ) -> Result<UserPreferences, BackendError> {
        let mut state = self.begin(BackendCall::UpdatePreferences {
            user_id: user_id.to_string(),
            changes: *changes,
        })?;
        let prefs = state.preferences.get_mut(user_id).ok_or_else(|| {
            BackendError::with_status(406, "JSON object requested, multiple (or no) rows returned")
        })?;
        prefs.apply(changes);
        prefs.updated_at = Utc::now();
        Ok(prefs.clone())
    }
}

impl StorageBackend for MemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let mut state = self.begin(BackendCall::Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        })?;
        let key = format!("{bucket}/{path}");
        if state.objects.contains_key(&key) {
            return Err(BackendError::with_status(409, "The resource already exists"));
        }
        state.objects.insert(key, (content_type.to_string(), bytes));
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), BackendError> {
        let mut state = self.begin(BackendCall::Remove {
            bucket: bucket.to_string(),
            path: path.to_string(),
        })?;
        state.objects.remove(&format!("{bucket}/{path}"));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://storage/v1/object/public/{bucket}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_emits_and_sets_session() {
        let backend = MemoryBackend::new();
        backend.add_user("ada@example.com", "secret-pw", "Ada");
        let mut sub = backend.subscribe();

        let err = backend.sign_in("ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.message, "Invalid login credentials");
        assert!(backend.get_session().await.unwrap().is_none());

        let session = backend.sign_in("ada@example.com", "secret-pw").await.unwrap();
        assert_eq!(session.user.email(), "ada@example.com");

        let event = sub.next().await.unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedIn);
        assert_eq!(event.session.unwrap().user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_email() {
        let backend = MemoryBackend::new();
        let outcome = backend.sign_up("bob@example.com", "pw-12345", "Bob").await.unwrap();
        assert_eq!(outcome.user.unwrap().full_name(), Some("Bob"));
        assert!(outcome.session.is_none());

        let err = backend.sign_up("bob@example.com", "pw-12345", "Bob").await.unwrap_err();
        assert_eq!(err.status, Some(422));
    }

    #[tokio::test]
    async fn test_update_user_requires_session() {
        let backend = MemoryBackend::new();
        let err = backend.update_user(&ProfileUpdate::default()).await.unwrap_err();
        assert_eq!(err.status, Some(401));
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let backend = MemoryBackend::new();
        backend.fail_next("sign_out", "network down");
        assert_eq!(backend.sign_out().await.unwrap_err().message, "network down");
        assert!(backend.sign_out().await.is_ok());
        assert_eq!(backend.calls(), vec![BackendCall::SignOut, BackendCall::SignOut]);
    }

    #[tokio::test]
    async fn test_preferences_table() {
        let backend = MemoryBackend::new();
        assert!(backend.get_preferences("u1").await.unwrap_err().is_not_found());

        backend.create_preferences("u1").await.unwrap();
        assert_eq!(backend.create_preferences("u1").await.unwrap_err().status, Some(409));

        let updated = backend
            .update_preferences("u1", &PreferencesUpdate::currency(crate::Currency::Mga))
            .await
            .unwrap();
        assert_eq!(updated.currency, crate::Currency::Mga);
        assert!(updated.updated_at >= updated.created_at);
    }
}
