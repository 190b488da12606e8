//! # Backend traits
//!
//! The three services the dashboard consumes from its hosted backend. Every
//! call resolves to `Result<_, BackendError>`; implementations normalize
//! transport and protocol failures into [`BackendError`] so the workflows never
//! see transport types.
//!
//! Implementations: `api::HostedBackend` (HTTP) and [`crate::MemoryBackend`]
//! (in-process, used by tests).
//!
//! Futures are not required to be `Send`: the UI runs on a single-threaded
//! wasm event loop.

use std::future::Future;

use crate::error::BackendError;
use crate::events::AuthSubscription;
use crate::models::{
    PreferencesUpdate, ProfileUpdate, Session, SignUpOutcome, User, UserPreferences,
};

/// Authentication service.
pub trait AuthBackend {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> impl Future<Output = Result<SignUpOutcome, BackendError>>;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, BackendError>>;

    /// Sends a reset link that lands on `redirect_url`.
    fn send_password_reset(
        &self,
        email: &str,
        redirect_url: &str,
    ) -> impl Future<Output = Result<(), BackendError>>;

    fn update_password(
        &self,
        new_password: &str,
    ) -> impl Future<Output = Result<User, BackendError>>;

    fn update_user(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<User, BackendError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), BackendError>>;

    /// The current session, if any. Does not emit events by itself unless the
    /// backend had to refresh or adopt a session to answer.
    fn get_session(&self) -> impl Future<Output = Result<Option<Session>, BackendError>>;

    fn subscribe(&self) -> AuthSubscription;
}

/// CRUD over the `user_preferences` table.
pub trait PreferencesBackend {
    /// Fails (typically with a not-found status) when the user has no row.
    fn get_preferences(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserPreferences, BackendError>>;

    /// Inserts the default row for `user_id`.
    fn create_preferences(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserPreferences, BackendError>>;

    /// Applies `changes` and stamps `updated_at`, returning the stored row.
    fn update_preferences(
        &self,
        user_id: &str,
        changes: &PreferencesUpdate,
    ) -> impl Future<Output = Result<UserPreferences, BackendError>>;
}

/// Object storage.
pub trait StorageBackend {
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), BackendError>>;

    fn remove(&self, bucket: &str, path: &str) -> impl Future<Output = Result<(), BackendError>>;

    /// Public URL of an object. Pure: no network call.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
