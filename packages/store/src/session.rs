//! # Session state machine
//!
//! [`SessionState`] is what the rest of the app reads: the signed-in user and
//! whether the initial probe is still running. [`SessionTracker`] owns the
//! transitions, and [`run_session`] drives a tracker from an [`AuthBackend`]:
//!
//! 1. subscribe to auth events (so nothing emitted during the probe is lost),
//! 2. probe the current session once,
//! 3. apply any events buffered while probing,
//! 4. publish the first resolved state (`loading == false`),
//! 5. publish again after every event until the subscription ends.
//!
//! The driver future owns the subscription; dropping it is the teardown.

use crate::backend::AuthBackend;
use crate::error::BackendError;
use crate::events::AuthEvent;
use crate::models::{Session, User};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True only until the initial probe resolves.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

#[derive(Debug, Default)]
pub struct SessionTracker {
    state: SessionState,
    seen_event: bool,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies the probe result. A failed probe resolves to signed-out.
    ///
    /// An event observed before the probe resolved is newer than the probe, so
    /// the probe then only ends the loading phase.
    pub fn resolve_probe(&mut self, probe: Result<Option<Session>, BackendError>) -> &SessionState {
        if !self.seen_event {
            self.state.user = match probe {
                Ok(session) => session.map(|s| s.user),
                Err(err) => {
                    tracing::warn!(error = %err, "session probe failed");
                    None
                }
            };
        }
        self.state.loading = false;
        &self.state
    }

    /// Replaces the user with the event's session user.
    pub fn apply(&mut self, event: &AuthEvent) -> &SessionState {
        self.seen_event = true;
        self.state.user = event.session.as_ref().map(|s| s.user.clone());
        self.state.loading = false;
        &self.state
    }
}

/// Drives the session for as long as the future is alive, calling `publish`
/// with every new state. Returns when the backend's event bus closes.
pub async fn run_session<B, F>(backend: &B, mut publish: F)
where
    B: AuthBackend,
    F: FnMut(SessionState),
{
    let mut events = backend.subscribe();
    let probe = backend.get_session().await;

    let mut tracker = SessionTracker::new();
    while let Some(event) = events.try_next() {
        tracker.apply(&event);
    }
    tracker.resolve_probe(probe);
    tracing::info!(
        authenticated = tracker.state().user.is_some(),
        "session resolved"
    );
    publish(tracker.state().clone());

    while let Some(event) = events.next().await {
        publish(tracker.apply(&event).clone());
    }
    tracing::debug!("auth event stream closed");
}
