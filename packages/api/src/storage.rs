//! Object storage (`/storage/v1/object`).

use reqwest::Method;
use store::{BackendError, StorageBackend};

use crate::client::{send, HostedBackend};

fn object_path(bucket: &str, path: &str) -> String {
    format!("/storage/v1/object/{bucket}/{path}")
}

impl StorageBackend for HostedBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let size = bytes.len();
        let request = self
            .authed_request(Method::POST, &object_path(bucket, path))
            .await
            .header("Content-Type", content_type)
            .header("Cache-Control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes);
        send(request).await?;
        tracing::info!(bucket, path, size, "object uploaded");
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), BackendError> {
        let request = self.authed_request(Method::DELETE, &object_path(bucket, path)).await;
        send(request).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.public_object_url(bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{route, serve};
    use crate::BackendConfig;
    use serde_json::json;
    use store::{AuthEventKind, Session};

    #[test]
    fn test_urls() {
        let backend = HostedBackend::new(BackendConfig::new("https://abcd.supabase.co", "k"));
        assert_eq!(object_path("avatars", "u1/1-a.png"), "/storage/v1/object/avatars/u1/1-a.png");
        assert_eq!(
            backend.public_url("avatars", "u1/1-a.png"),
            "https://abcd.supabase.co/storage/v1/object/public/avatars/u1/1-a.png"
        );
    }

    #[tokio::test]
    async fn test_upload_refreshes_expired_token() {
        let fresh = json!({
            "access_token": "fresh",
            "refresh_token": "r2",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": "u1", "user_metadata": {} }
        });
        let server = serve(vec![
            route("/auth/v1/token", 200, fresh),
            route("/storage/v1/object/avatars/", 200, json!({ "Key": "avatars/u1/1-a.png" })),
        ])
        .await;
        let backend = HostedBackend::new(BackendConfig::new(server.url.as_str(), "k"));
        let stale: Session = serde_json::from_value(json!({
            "access_token": "stale",
            "refresh_token": "r1",
            "expires_at": 1,
            "user": { "id": "u1", "user_metadata": {} }
        }))
        .unwrap();
        backend.set_session(AuthEventKind::SignedIn, Some(stale));

        backend
            .upload("avatars", "u1/1-a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].path, "/storage/v1/object/avatars/u1/1-a.png");
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer fresh"));
    }
}
