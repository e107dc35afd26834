//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Client errors carry `{"message": ...}`. Server errors are logged in full and
//! answered with a generic `{"error": "Internal server error"}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Malformed or incomplete request body.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or rejected bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status plus the client-facing message, or `None` for server errors.
    fn classify(&self) -> (StatusCode, Option<String>) {
        match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, Some(msg.clone())),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg.clone())),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Some(msg.clone())),
            Self::Auth(err) => match err {
                AuthError::UserAlreadyExists => {
                    (StatusCode::BAD_REQUEST, Some("User already exists".to_owned()))
                }
                AuthError::InvalidCredentials => {
                    (StatusCode::BAD_REQUEST, Some("Invalid credentials".to_owned()))
                }
                AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, Some(msg.clone())),
                AuthError::InvalidEmail(e) => (StatusCode::BAD_REQUEST, Some(e.to_string())),
                AuthError::UserNotFound => (StatusCode::NOT_FOUND, Some("User not found".to_owned())),
                AuthError::Token(_) | AuthError::PasswordHash(_) | AuthError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, None)
                }
            },
            Self::Database(_) | Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();

        match message {
            Some(message) => (status, Json(json!({ "message": message }))).into_response(),
            None => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                (status, Json(json!({ "error": INTERNAL_MESSAGE }))).into_response()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current request.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Item not found".to_string());
        assert_eq!(err.to_string(), "Not found: Item not found");

        let err = AppError::Validation("title is required".to_string());
        assert_eq!(err.to_string(), "Validation error: title is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_client_errors_carry_message() {
        let (status, body) = body_of(AppError::Auth(AuthError::UserAlreadyExists)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "User already exists" }));
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "relation shop.items has bad row".to_string(),
        ));
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
