use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use store::{AuthEvent, AuthEventBus, AuthEventKind, Session};

use crate::auth::config::BackendConfig;
use crate::auth::session::SessionStore;
use crate::error::ApiError;

/// HTTP client for the hosted backend. Cheap to clone; clones share the
/// session and the auth-event bus.
#[derive(Clone)]
pub struct HostedBackend {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: BackendConfig,
    session: Mutex<Option<Session>>,
    store: SessionStore,
    events: AuthEventBus,
}

impl std::fmt::Debug for HostedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedBackend")
            .field("url", &self.inner.config.url)
            .finish_non_exhaustive()
    }
}

impl PartialEq for HostedBackend {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl HostedBackend {
    pub fn new(config: BackendConfig) -> Self {
        let store = SessionStore::new(config.storage_key());
        Self {
            inner: Arc::new(Inner {
                http: reqwest::Client::new(),
                config,
                session: Mutex::new(None),
                store,
                events: AuthEventBus::new(),
            }),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    pub(crate) fn events(&self) -> &AuthEventBus {
        &self.inner.events
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.inner.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The in-memory session, falling back to the persisted one.
    pub(crate) fn cached_session(&self) -> Option<Session> {
        let mut current = self.lock();
        if current.is_none() {
            *current = self.inner.store.load();
        }
        current.clone()
    }

    /// Replaces the session, persists it and emits `kind`.
    pub(crate) fn set_session(&self, kind: AuthEventKind, session: Option<Session>) {
        self.inner.store.save(session.as_ref());
        *self.lock() = session.clone();
        self.inner.events.emit(AuthEvent::new(kind, session));
    }

    /// A request to `path` authorized by the public key alone.
    pub(crate) fn anon_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_with_token(method, path, &self.inner.config.public_key)
    }

    pub(crate) fn request_with_token(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, self.inner.config.endpoint(path))
            .header("apikey", &self.inner.config.public_key)
            .bearer_auth(token)
    }

    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        self.inner
            .config
            .endpoint(&format!("/storage/v1/object/public/{bucket}/{path}"))
    }
}

/// Sends `request`, mapping non-success statuses to [`ApiError::Status`].
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_body(status.as_u16(), &body);
    tracing::debug!(status = status.as_u16(), error = %err, "backend request failed");
    Err(err)
}

/// Sends `request` and decodes the JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let body = send(request).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
}
