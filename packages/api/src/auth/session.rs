//! Session persistence and recovery-link detection.
//!
//! On wasm the session lives in `localStorage` under a project-scoped key so a
//! reload resumes it; native builds keep it in memory only. A password-reset
//! email links back with the tokens in the URL fragment:
//!
//! ```text
//! /reset-password#access_token=…&expires_in=3600&refresh_token=…&token_type=bearer&type=recovery
//! ```
//!
//! [`take_recovery_fragment`] reads and clears that fragment once.

use store::Session;

pub struct SessionStore {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    key: String,
}

impl SessionStore {
    pub fn new(key: String) -> Self {
        Self { key }
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load(&self) -> Option<Session> {
        let raw = Self::storage()?.get_item(&self.key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable persisted session");
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, session: Option<&Session>) {
        let Some(storage) = Self::storage() else {
            return;
        };
        let result = match session.map(serde_json::to_string) {
            Some(Ok(json)) => storage.set_item(&self.key, &json),
            Some(Err(e)) => {
                tracing::error!(error = %e, "could not serialize session");
                return;
            }
            None => storage.remove_item(&self.key),
        };
        if result.is_err() {
            tracing::warn!("localStorage unavailable, session not persisted");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self) -> Option<Session> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, _session: Option<&Session>) {}
}

/// Tokens carried by a recovery link.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub expires_at: Option<i64>,
    pub token_type: String,
}

/// Parses a URL fragment (with or without the leading `#`). Only fragments
/// with `type=recovery` and both tokens qualify.
pub fn parse_fragment(fragment: &str) -> Option<RecoveryTokens> {
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = 0;
    let mut expires_at = None;
    let mut token_type = "bearer".to_string();
    let mut is_recovery = false;

    for pair in fragment.trim_start_matches('#').split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "access_token" => access_token = Some(value.to_string()),
            "refresh_token" => refresh_token = Some(value.to_string()),
            "expires_in" => expires_in = value.parse().unwrap_or(0),
            "expires_at" => expires_at = value.parse().ok(),
            "token_type" => token_type = value.to_string(),
            "type" => is_recovery = value == "recovery",
            _ => {}
        }
    }

    if !is_recovery {
        return None;
    }
    Some(RecoveryTokens {
        access_token: access_token.filter(|t| !t.is_empty())?,
        refresh_token: refresh_token.filter(|t| !t.is_empty())?,
        expires_in,
        expires_at,
        token_type,
    })
}

/// Reads the recovery tokens from the current URL and clears the fragment.
#[cfg(target_arch = "wasm32")]
pub fn take_recovery_fragment() -> Option<RecoveryTokens> {
    let location = web_sys::window()?.location();
    let hash = location.hash().ok()?;
    let tokens = parse_fragment(&hash)?;
    if location.set_hash("").is_err() {
        tracing::warn!("could not clear recovery fragment");
    }
    Some(tokens)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn take_recovery_fragment() -> Option<RecoveryTokens> {
    None
}
