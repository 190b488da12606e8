//! Load-or-create and update of the signed-in user's preferences row.

use crate::backend::PreferencesBackend;
use crate::error::BackendError;
use crate::models::{PreferencesUpdate, UserPreferences};

/// The user's preferences, created with defaults on first read-miss.
///
/// Returns `None` without a user, or when both the read and the create fail
/// (the create failure is logged).
pub async fn load_or_create<B: PreferencesBackend>(
    backend: &B,
    user_id: Option<&str>,
) -> Option<UserPreferences> {
    let user_id = user_id?;
    match backend.get_preferences(user_id).await {
        Ok(prefs) => Some(prefs),
        Err(err) => {
            if !err.is_not_found() {
                tracing::warn!(error = %err, "preferences fetch failed, creating defaults");
            }
            match backend.create_preferences(user_id).await {
                Ok(prefs) => {
                    tracing::info!(user_id, "created default preferences");
                    Some(prefs)
                }
                Err(err) => {
                    tracing::error!(error = %err, "could not create preferences");
                    None
                }
            }
        }
    }
}

/// Persists `changes` when there is a user and loaded preferences to update.
///
/// `Ok(None)` means nothing was sent. On success the returned row replaces the
/// caller's local copy.
pub async fn update_preferences<B: PreferencesBackend>(
    backend: &B,
    user_id: Option<&str>,
    current: Option<&UserPreferences>,
    changes: PreferencesUpdate,
) -> Result<Option<UserPreferences>, BackendError> {
    let (Some(user_id), Some(_)) = (user_id, current) else {
        return Ok(None);
    };
    if changes.is_empty() {
        return Ok(None);
    }
    let updated = backend.update_preferences(user_id, &changes).await?;
    Ok(Some(updated))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::memory::{BackendCall, MemoryBackend};
    use crate::models::Language;
    use crate::Currency;

    #[tokio::test]
    async fn test_no_user_resolves_empty() {
        let backend = MemoryBackend::new();
        assert!(load_or_create(&backend, None).await.is_none());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_miss_then_create_defaults() {
        let backend = MemoryBackend::new();
        let prefs = load_or_create(&backend, Some("u1")).await.unwrap();

        assert_eq!(prefs.user_id, "u1");
        assert_eq!(prefs.currency, Currency::Eur);
        assert_eq!(prefs.language, Language::Fr);
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::GetPreferences { user_id: "u1".into() },
                BackendCall::CreatePreferences { user_id: "u1".into() },
            ]
        );
        assert_eq!(backend.stored_preferences("u1"), Some(prefs));
    }

    #[tokio::test]
    async fn test_existing_row_is_used() {
        let backend = MemoryBackend::new();
        let mut row = UserPreferences::defaults_for("u1", Utc::now());
        row.language = Language::En;
        backend.insert_preferences(row.clone());

        assert_eq!(load_or_create(&backend, Some("u1")).await, Some(row));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_leaves_empty() {
        let backend = MemoryBackend::new();
        backend.fail_next("create_preferences", "permission denied for table");
        assert!(load_or_create(&backend, Some("u1")).await.is_none());
    }

    #[tokio::test]
    async fn test_update_is_noop_without_user_or_row() {
        let backend = MemoryBackend::new();
        let row = UserPreferences::defaults_for("u1", Utc::now());
        let change = PreferencesUpdate::currency(Currency::Mga);

        assert_eq!(update_preferences(&backend, None, Some(&row), change).await, Ok(None));
        assert_eq!(update_preferences(&backend, Some("u1"), None, change).await, Ok(None));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_returns_stored_row() {
        let backend = MemoryBackend::new();
        let row = load_or_create(&backend, Some("u1")).await.unwrap();

        let updated = update_preferences(
            &backend,
            Some("u1"),
            Some(&row),
            PreferencesUpdate::language(Language::En),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.language, Language::En);
        assert_eq!(updated.currency, Currency::Eur);
        assert!(updated.updated_at >= row.updated_at);
    }

    #[tokio::test]
    async fn test_update_failure_propagates() {
        let backend = MemoryBackend::new();
        let row = load_or_create(&backend, Some("u1")).await.unwrap();
        backend.fail_next("update_preferences", "row-level security violation");

        let err = update_preferences(
            &backend,
            Some("u1"),
            Some(&row),
            PreferencesUpdate::currency(Currency::Mga),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "row-level security violation");
        assert_eq!(backend.stored_preferences("u1").unwrap().currency, Currency::Eur);
    }
}
