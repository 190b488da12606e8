//! # Auth service (`/auth/v1`)
//!
//! Sign-up, password sign-in, reset emails, user updates and sign-out, plus the
//! session probe used at startup. Every call that changes the session emits on
//! the client's [`store::AuthEventBus`].
//!
//! The probe ([`store::AuthBackend::get_session`]) resolves in this order:
//! 1. a recovery link in the URL fragment is adopted and `PasswordRecovery` emitted,
//! 2. otherwise the in-memory or persisted session is used,
//! 3. an expired session is refreshed (`TokenRefreshed`); a failed refresh
//!    clears it (`SignedOut`).

pub mod config;
pub mod session;

use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use store::{
    AuthBackend, AuthEventKind, AuthSubscription, BackendError, ProfileUpdate, Session,
    SignUpOutcome, User,
};

use crate::client::{send, send_json, HostedBackend};
use crate::error::ApiError;
use session::{take_recovery_fragment, RecoveryTokens};

/// Refresh this long before the access token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Fills in `expires_at` from `expires_in` when the service omitted it.
fn complete(mut session: Session, now: i64) -> Session {
    if session.expires_at.is_none() && session.expires_in > 0 {
        session.expires_at = Some(now + session.expires_in);
    }
    session
}

/// A sign-up answers with a session when confirmation is disabled, and with
/// the bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(User),
}

fn missing_session() -> BackendError {
    BackendError::with_status(401, "Auth session missing!")
}

impl HostedBackend {
    async fn refresh(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let request = self
            .request_with_token(Method::POST, "/auth/v1/token", &self.config().public_key)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));
        let session: Session = send_json(request).await?;
        Ok(complete(session, now_secs()))
    }

    async fn adopt_recovery(&self, tokens: RecoveryTokens) -> Result<Session, ApiError> {
        let request = self.request_with_token(Method::GET, "/auth/v1/user", &tokens.access_token);
        let user: User = send_json(request).await?;
        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            expires_at: tokens.expires_at,
            token_type: tokens.token_type,
            user,
        };
        Ok(complete(session, now_secs()))
    }

    /// The current session, refreshed first when it is about to expire.
    async fn live_session(&self) -> Option<Session> {
        let session = self.cached_session()?;
        if !session.is_expired(now_secs(), EXPIRY_MARGIN_SECS) {
            return Some(session);
        }
        match self.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                tracing::info!("access token refreshed");
                self.set_session(AuthEventKind::TokenRefreshed, Some(fresh.clone()));
                Some(fresh)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, signing out locally");
                self.set_session(AuthEventKind::SignedOut, None);
                None
            }
        }
    }

    /// A request carrying the user's access token, refreshed first when it is
    /// about to expire. Falls back to the public key when signed out.
    pub(crate) async fn authed_request(&self, method: Method, path: &str) -> RequestBuilder {
        match self.live_session().await {
            Some(session) => self.request_with_token(method, path, &session.access_token),
            None => self.anon_request(method, path),
        }
    }

    /// PUTs `body` to the user endpoint and mirrors the returned user locally.
    async fn put_user(&self, body: Value) -> Result<User, BackendError> {
        let session = self.live_session().await.ok_or_else(missing_session)?;
        let request = self
            .request_with_token(Method::PUT, "/auth/v1/user", &session.access_token)
            .json(&body);
        let user: User = send_json(request).await?;
        let updated = Session {
            user: user.clone(),
            ..session
        };
        self.set_session(AuthEventKind::UserUpdated, Some(updated));
        Ok(user)
    }
}

impl AuthBackend for HostedBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let request = self
            .anon_request(Method::POST, "/auth/v1/signup")
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }));
        let outcome = match send_json::<SignUpResponse>(request).await? {
            SignUpResponse::Session(session) => {
                let session = complete(session, now_secs());
                self.set_session(AuthEventKind::SignedIn, Some(session.clone()));
                SignUpOutcome {
                    user: Some(session.user.clone()),
                    session: Some(session),
                }
            }
            SignUpResponse::User(user) => SignUpOutcome {
                user: Some(user),
                session: None,
            },
        };
        tracing::info!(confirmed = outcome.session.is_some(), "account created");
        Ok(outcome)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let request = self
            .request_with_token(Method::POST, "/auth/v1/token", &self.config().public_key)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let session = complete(send_json::<Session>(request).await?, now_secs());
        self.set_session(AuthEventKind::SignedIn, Some(session.clone()));
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str, redirect_url: &str) -> Result<(), BackendError> {
        let request = self
            .anon_request(Method::POST, "/auth/v1/recover")
            .query(&[("redirect_to", redirect_url)])
            .json(&json!({ "email": email }));
        send(request).await?;
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<User, BackendError> {
        self.put_user(json!({ "password": new_password })).await
    }

    async fn update_user(&self, update: &ProfileUpdate) -> Result<User, BackendError> {
        let body = serde_json::to_value(update).map_err(ApiError::from)?;
        self.put_user(body).await
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if let Some(session) = self.cached_session() {
            let request =
                self.request_with_token(Method::POST, "/auth/v1/logout", &session.access_token);
            match send(request).await {
                Ok(_) => {}
                // The token is already invalid server-side; finish locally.
                Err(ApiError::Status { status: 401 | 403 | 404, .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
        self.set_session(AuthEventKind::SignedOut, None);
        tracing::info!("signed out");
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        if let Some(tokens) = take_recovery_fragment() {
            let session = self.adopt_recovery(tokens).await?;
            self.set_session(AuthEventKind::PasswordRecovery, Some(session.clone()));
            return Ok(Some(session));
        }
        Ok(self.live_session().await)
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events().subscribe()
    }
}
