//! Errors returned by the backend client.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token in the session; the request was not sent
    #[error("not signed in")]
    MissingToken,

    /// The backend rejected the token (HTTP 401)
    #[error("session expired or invalid: {}", message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },

    /// Non-success response
    #[error("backend returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Remote {
        status: u16,
        message: Option<String>,
    },

    /// The request never got a response
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message to show the user: the server's own text when it sent one,
    /// otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::MissingToken => "Unauthorized".to_string(),
            ApiError::Unauthorized {
                message: Some(message),
            }
            | ApiError::Remote {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the session should be dropped and the user sent to sign in
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::MissingToken)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Build a remote error from a status and the raw error body
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        if status == 401 {
            return ApiError::Unauthorized { message };
        }
        ApiError::Remote { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// The backend reports failures as `{"msg": ..}` on the scheduling/video
/// routes and `{"error": ..}` on the auth/device routes
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "error", "message", "detail"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
