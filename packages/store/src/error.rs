//! Normalized error returned by every backend call.

use serde::{Deserialize, Serialize};

/// Error reported by (or on the way to) the hosted backend.
///
/// `message` is meant for display. It is empty only when the backend gave
/// nothing usable, in which case callers fall back to a localized message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
    /// HTTP status, when the error came from a response.
    pub status: Option<u16>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// The message, unless it is blank.
    pub fn display_message(&self) -> Option<&str> {
        let msg = self.message.trim();
        (!msg.is_empty()).then_some(msg)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.status, Some(404) | Some(406))
    }
}
