//! # Domain models shared by the client, the workflows and the UI
//!
//! These mirror the JSON the hosted backend speaks, so they derive
//! `Serialize + Deserialize` and can be decoded straight from response bodies.
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`User`] | The signed-in identity. Only `id`, `email` and the `user_metadata` map are consumed; `full_name` and `avatar_url` live in the map. |
//! | [`Session`] | Access/refresh token pair plus the user they belong to. |
//! | [`SignUpOutcome`] | Result of a sign-up: a user, and a session when no email confirmation is required. |
//! | [`ProfileUpdate`] | Body of an auth "update user" call. `email` is omitted from the JSON when unchanged. |
//! | [`UserPreferences`] | One row of the `user_preferences` table. |
//! | [`PreferencesUpdate`] | The only fields a caller may change on a preferences row. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::currency::Currency;

/// Identity record returned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl User {
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.user_metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.metadata_str("full_name")
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.metadata_str("avatar_url")
    }

    /// Full name, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.full_name().unwrap_or_else(|| self.email())
    }

    /// Two-letter uppercase initials used by avatar fallbacks.
    pub fn initials(&self) -> String {
        initials(self.display_name())
    }
}

/// First two characters of `name`, uppercased.
pub fn initials(name: &str) -> String {
    name.chars().take(2).collect::<String>().to_uppercase()
}

/// Authenticated session as issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix timestamp (seconds). Filled in from `expires_in` when absent.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Whether the access token is expired, or expires within `margin_secs`.
    pub fn is_expired(&self, now_secs: i64, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(at) => at <= now_secs + margin_secs,
            None => false,
        }
    }
}

/// What a sign-up returns. `session` is `None` while email confirmation is pending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignUpOutcome {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Metadata written alongside a profile update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileMetadata {
    pub full_name: String,
    pub avatar_url: String,
}

/// Body of an "update user" call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub data: ProfileMetadata,
}

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Parses a language tag such as `"en"` or `"en-US"`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.split(['-', '_']).next()?.to_ascii_lowercase().as_str() {
            "fr" => Some(Language::Fr),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Name of the language in itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::En => "English",
        }
    }
}

/// One row of the `user_preferences` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: String,
    pub currency: Currency,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    /// Row inserted the first time a user's preferences are read.
    pub fn defaults_for(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            currency: Currency::Eur,
            language: Language::Fr,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: &PreferencesUpdate) {
        if let Some(currency) = changes.currency {
            self.currency = currency;
        }
        if let Some(language) = changes.language {
            self.language = language;
        }
    }
}

/// Caller-editable subset of [`UserPreferences`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl PreferencesUpdate {
    pub fn currency(currency: Currency) -> Self {
        Self {
            currency: Some(currency),
            ..Self::default()
        }
    }

    pub fn language(language: Language) -> Self {
        Self {
            language: Some(language),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.currency.is_none() && self.language.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_metadata_accessors() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "ada@example.com",
            "user_metadata": { "full_name": "Ada Lovelace", "avatar_url": "" }
        }))
        .unwrap();

        assert_eq!(user.full_name(), Some("Ada Lovelace"));
        assert_eq!(user.avatar_url(), None);
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_eq!(user.initials(), "AD");
    }

    #[test]
    fn test_user_without_metadata_falls_back_to_email() {
        let user: User = serde_json::from_value(json!({ "id": "u1", "email": "bob@example.com" })).unwrap();
        assert_eq!(user.display_name(), "bob@example.com");
    }

    #[test]
    fn test_profile_update_omits_unchanged_email() {
        let update = ProfileUpdate {
            email: None,
            data: ProfileMetadata {
                full_name: "Ada".into(),
                avatar_url: String::new(),
            },
        };
        let body = serde_json::to_value(&update).unwrap();
        assert!(body.get("email").is_none());
        assert_eq!(body["data"]["full_name"], "Ada");
    }

    #[test]
    fn test_preferences_wire_format() {
        let prefs: UserPreferences = serde_json::from_value(json!({
            "user_id": "u1",
            "currency": "MGA",
            "language": "en",
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(prefs.currency, Currency::Mga);
        assert_eq!(prefs.language, Language::En);

        let body = serde_json::to_value(PreferencesUpdate::language(Language::Fr)).unwrap();
        assert_eq!(body, json!({ "language": "fr" }));
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("en-US"), Some(Language::En));
        assert_eq!(Language::parse("FR"), Some(Language::Fr));
        assert_eq!(Language::parse("de"), None);
    }

    #[test]
    fn test_session_expiry() {
        let session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_in: 3600,
            expires_at: Some(1_000),
            token_type: "bearer".into(),
            user: User {
                id: "u1".into(),
                email: None,
                user_metadata: Map::new(),
            },
        };
        assert!(!session.is_expired(900, 10));
        assert!(session.is_expired(995, 10));
    }
}
