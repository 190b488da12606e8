//! Client-side errors and their conversion into [`BackendError`].

use serde_json::Value;
use store::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Non-success status; `message` is what the backend said, if anything.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Config(String),
}

impl ApiError {
    /// Builds a status error from a response body, extracting the backend's
    /// message from whichever field the service uses.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_default();
        ApiError::Status { status, message }
    }
}

/// The human-readable message of an error body. GoTrue uses `msg` or
/// `error_description`, PostgREST and Storage use `message`, older endpoints
/// only `error`.
pub fn error_message(body: &Value) -> Option<String> {
    ["msg", "error_description", "message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => BackendError::with_status(status, message),
            ApiError::Transport(e) => {
                tracing::error!(error = %e, "backend unreachable");
                BackendError {
                    message: String::new(),
                    status: e.status().map(|s| s.as_u16()),
                }
            }
            ApiError::Decode(e) => {
                tracing::error!(error = %e, "unexpected backend response");
                BackendError::new("")
            }
            ApiError::Config(message) => BackendError::new(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_field_order() {
        assert_eq!(
            error_message(&json!({"code": 400, "msg": "Invalid login credentials"})).as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            error_message(&json!({"error": "invalid_grant", "error_description": "Refresh Token Not Found"}))
                .as_deref(),
            Some("Refresh Token Not Found")
        );
        assert_eq!(
            error_message(&json!({"statusCode": "409", "error": "Duplicate", "message": "The resource already exists"}))
                .as_deref(),
            Some("The resource already exists")
        );
        assert_eq!(error_message(&json!({"error": "  "})), None);
    }

    #[test]
    fn test_status_error_becomes_backend_error() {
        let err: BackendError =
            ApiError::from_body(406, r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#)
                .into();
        assert!(err.is_not_found());
        assert_eq!(err.message, "JSON object requested, multiple (or no) rows returned");

        let err: BackendError = ApiError::from_body(502, "<html>Bad gateway</html>").into();
        assert_eq!(err.status, Some(502));
        assert_eq!(err.display_message(), None);
    }

    #[test]
    fn test_decode_error_has_no_display_message() {
        let decode = serde_json::from_str::<Value>("{").unwrap_err();
        let err: BackendError = ApiError::Decode(decode).into();
        assert_eq!(err.display_message(), None);
    }
}
