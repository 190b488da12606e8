//! # Application configuration (`app.toml`)
//!
//! Bundled with the web binary and parsed at startup. Every field has a
//! default, so a missing or empty file yields a config that only lacks the
//! backend credentials.
//!
//! ```toml
//! [app]
//! name = "Dashboard"
//!
//! [backend]
//! url = "https://project.supabase.co"
//! public_key = "anon-key"
//!
//! [avatars]
//! bucket = "avatars"
//! max_size_bytes = 5242880
//! ```
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`AppConfig`] | Top-level config, TOML (de)serialisation, filename constant. |
//! | [`AppSection`] | Display name of the application. |
//! | [`BackendSection`] | Hosted backend project URL and public (anon) key. |
//! | [`AvatarSection`] | Storage bucket and size limit for avatars. |

use serde::{Deserialize, Serialize};

use crate::profile::{AVATAR_BUCKET, MAX_AVATAR_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("missing setting `{0}`")]
    Missing(&'static str),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub avatars: AvatarSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
}

fn default_app_name() -> String {
    "Dashboard".to_string()
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

/// Hosted backend credentials. Empty means "not configured".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendSection {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub public_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarSection {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_max_size")]
    pub max_size_bytes: u64,
}

fn default_bucket() -> String {
    AVATAR_BUCKET.to_string()
}

fn default_max_size() -> u64 {
    MAX_AVATAR_SIZE
}

impl Default for AvatarSection {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            max_size_bytes: default_max_size(),
        }
    }
}

impl AppConfig {
    /// Builder method to set the backend credentials.
    pub fn with_backend(mut self, url: impl Into<String>, public_key: impl Into<String>) -> Self {
        self.backend = BackendSection {
            url: url.into(),
            public_key: public_key.into(),
        };
        self
    }

    pub fn filename() -> &'static str {
        "app.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Fails when the backend URL or key is blank.
    pub fn require_backend(&self) -> Result<&BackendSection, ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Missing("backend.url"));
        }
        if self.backend.public_key.trim().is_empty() {
            return Err(ConfigError::Missing("backend.public_key"));
        }
        Ok(&self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.app.name, "Dashboard");
        assert_eq!(config.avatars.bucket, "avatars");
        assert_eq!(config.avatars.max_size_bytes, 5 * 1024 * 1024);
        assert!(matches!(
            config.require_backend(),
            Err(ConfigError::Missing("backend.url"))
        ));
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml(
            r#"
[backend]
url = "https://demo.supabase.co"
public_key = "anon"
"#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "https://demo.supabase.co");
        assert_eq!(config.avatars, AvatarSection::default());
        assert!(config.require_backend().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default().with_backend("https://x.supabase.co", "k");
        let text = config.to_toml().unwrap();
        assert!(text.contains("[backend]"));
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = AppConfig::from_toml("[backend\nurl = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
