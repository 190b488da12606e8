//! Backend connection settings: bundled config plus environment overrides.

use store::AppConfig;

use crate::error::ApiError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Where the hosted project lives and the public key sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub public_key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            public_key: public_key.into(),
        }
    }

    /// Settings from `app.toml`, overridden by `SUPABASE_URL` /
    /// `SUPABASE_ANON_KEY` when set. On native builds a `.env` file is loaded
    /// first; on wasm the variables are read at compile time.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ApiError> {
        let (url, key) = env_overrides();
        Self::new(&config.backend.url, &config.backend.public_key)
            .with_overrides(url, key)
            .validate()
    }

    pub fn with_overrides(mut self, url: Option<String>, public_key: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = public_key.filter(|k| !k.trim().is_empty()) {
            self.public_key = key;
        }
        self
    }

    pub fn validate(self) -> Result<Self, ApiError> {
        if self.url.trim().is_empty() {
            return Err(ApiError::Config(format!("{URL_VAR} not set")));
        }
        if self.public_key.trim().is_empty() {
            return Err(ApiError::Config(format!("{KEY_VAR} not set")));
        }
        Ok(self)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Key under which the session is persisted, scoped to the project.
    pub fn storage_key(&self) -> String {
        let host = self
            .url
            .split("://")
            .nth(1)
            .unwrap_or(&self.url)
            .split('.')
            .next()
            .unwrap_or_default();
        format!("sb-{host}-auth-token")
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_overrides() -> (Option<String>, Option<String>) {
    dotenvy::dotenv().ok();
    (std::env::var(URL_VAR).ok(), std::env::var(KEY_VAR).ok())
}

#[cfg(target_arch = "wasm32")]
fn env_overrides() -> (Option<String>, Option<String>) {
    (
        option_env!("SUPABASE_URL").map(str::to_string),
        option_env!("SUPABASE_ANON_KEY").map(str::to_string),
    )
}
