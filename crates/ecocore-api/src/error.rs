use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every service-layer failure is caught at the handler boundary and mapped
/// to an HTTP status plus a JSON `{message}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    Validation(String),

    /// Username already taken (409).
    #[error("{0}")]
    Conflict(String),

    /// Unknown username or wrong password. Deliberately the same message
    /// for both, so usernames cannot be enumerated (401).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing or malformed Authorization header (401).
    #[error("Missing authorization token")]
    Unauthorized,

    /// Bad signature or expired token (403).
    #[error("Invalid or expired token")]
    Forbidden,

    /// No such resource (404).
    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected (500). Logged server-side; the body never carries
    /// the underlying error.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Internal(e) => {
                error!("internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(anyhow::Error::from(e))
    }
}
