//! `user_preferences` table over PostgREST (`/rest/v1`).
//!
//! Single-row reads ask for `application/vnd.pgrst.object+json`, so a missing
//! row comes back as `406` (see [`store::BackendError::is_not_found`]).

use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use store::{BackendError, PreferencesBackend, PreferencesUpdate, UserPreferences};

use crate::client::{send_json, HostedBackend};

const TABLE: &str = "/rest/v1/user_preferences";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

fn user_filter(user_id: &str) -> String {
    format!("eq.{user_id}")
}

impl PreferencesBackend for HostedBackend {
    async fn get_preferences(&self, user_id: &str) -> Result<UserPreferences, BackendError> {
        let filter = user_filter(user_id);
        let request = self
            .authed_request(Method::GET, TABLE)
            .await
            .query(&[("select", "*"), ("user_id", filter.as_str())])
            .header("Accept", SINGLE_OBJECT);
        Ok(send_json(request).await?)
    }

    async fn create_preferences(&self, user_id: &str) -> Result<UserPreferences, BackendError> {
        let defaults = UserPreferences::defaults_for(user_id, Utc::now());
        let request = self
            .authed_request(Method::POST, TABLE)
            .await
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&json!({
                "user_id": defaults.user_id,
                "currency": defaults.currency,
                "language": defaults.language,
            }));
        Ok(send_json(request).await?)
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        changes: &PreferencesUpdate,
    ) -> Result<UserPreferences, BackendError> {
        let mut body = serde_json::to_value(changes).map_err(crate::ApiError::from)?;
        body["updated_at"] = json!(Utc::now());
        let request = self
            .authed_request(Method::PATCH, TABLE)
            .await
            .query(&[("user_id", user_filter(user_id))])
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&body);
        Ok(send_json(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{route, serve};
    use crate::BackendConfig;
    use serde_json::Value;
    use store::{AuthBackend, AuthEventKind, Currency, Language, Session};

    fn session(access_token: &str, expires_at: i64) -> Value {
        json!({
            "access_token": access_token,
            "refresh_token": "r1",
            "expires_in": 3600,
            "expires_at": expires_at,
            "token_type": "bearer",
            "user": { "id": "u1", "email": "ada@example.com", "user_metadata": {} }
        })
    }

    fn row() -> Value {
        json!({
            "user_id": "u1",
            "currency": "EUR",
            "language": "fr",
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        })
    }

    fn signed_in(url: &str, expires_at: i64) -> HostedBackend {
        let backend = HostedBackend::new(BackendConfig::new(url, "k"));
        let stale: Session = serde_json::from_value(session("stale", expires_at)).unwrap();
        backend.set_session(AuthEventKind::SignedIn, Some(stale));
        backend
    }

    #[test]
    fn test_update_body_only_carries_changes() {
        let body = serde_json::to_value(PreferencesUpdate::currency(Currency::Mga)).unwrap();
        assert_eq!(body, json!({ "currency": "MGA" }));
        let body = serde_json::to_value(PreferencesUpdate::language(Language::En)).unwrap();
        assert_eq!(body, json!({ "language": "en" }));
    }

    #[test]
    fn test_row_decodes() {
        let row: UserPreferences = serde_json::from_value(json!({
            "user_id": "u1",
            "currency": "EUR",
            "language": "fr",
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-02T10:00:00.123456+00:00"
        }))
        .unwrap();
        assert_eq!(row.currency, Currency::Eur);
        assert_eq!(row.language, Language::Fr);
        assert!(row.updated_at > row.created_at);
    }

    #[test]
    fn test_user_filter() {
        assert_eq!(user_filter("0b6f"), "eq.0b6f");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_before_query() {
        let fresh = session("fresh", Utc::now().timestamp() + 3600);
        let server = serve(vec![
            route("/auth/v1/token", 200, fresh),
            route(TABLE, 200, row()),
        ])
        .await;
        let backend = signed_in(&server.url, 1);
        let mut sub = backend.subscribe();

        let prefs = backend.get_preferences("u1").await.unwrap();
        assert_eq!(prefs.currency, Currency::Eur);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].path.starts_with("/auth/v1/token?grant_type=refresh_token"));
        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer fresh"));
        assert_eq!(sub.try_next().map(|e| e.kind), Some(AuthEventKind::TokenRefreshed));
    }

    #[tokio::test]
    async fn test_valid_token_is_sent_as_is() {
        let server = serve(vec![route(TABLE, 200, row())]).await;
        let backend = signed_in(&server.url, Utc::now().timestamp() + 3600);

        backend
            .update_preferences("u1", &PreferencesUpdate::language(Language::En))
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer stale"));
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out_before_query() {
        let server = serve(vec![
            route("/auth/v1/token", 400, json!({ "error_description": "Invalid Refresh Token" })),
            route(TABLE, 401, json!({ "message": "JWT expired" })),
        ])
        .await;
        let backend = signed_in(&server.url, 1);
        let mut sub = backend.subscribe();

        let err = backend.create_preferences("u1").await.unwrap_err();
        assert_eq!(err.status, Some(401));

        let requests = server.requests();
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer k"));
        assert_eq!(sub.try_next().map(|e| e.kind), Some(AuthEventKind::SignedOut));
        assert_eq!(backend.get_session().await, Ok(None));
    }
}
