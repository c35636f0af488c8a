//! Structured error types for API responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    ValidationError,
    InvalidCredentials,
    EmailTaken,

    // Auth errors
    Unauthorized,
    Forbidden,

    // Not found errors
    TaskNotFound,
    SubtaskNotFound,
    UserNotFound,

    // Internal errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// HTTP status the boundary layer translates this code into.
    ///
    /// `InvalidCredentials` and `EmailTaken` map to 400 to match the
    /// original API contract rather than 401/409.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::InvalidCredentials
            | ErrorCode::EmailTaken => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::TaskNotFound | ErrorCode::SubtaskNotFound | ErrorCode::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured error for API responses.
#[derive(Debug, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn validation(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::ValidationError, reason).with_field(field)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "Invalid credentials")
    }

    pub fn email_taken() -> Self {
        Self::new(ErrorCode::EmailTaken, "User already exists")
    }

    pub fn unauthorized(reason: &str) -> Self {
        Self::new(ErrorCode::Unauthorized, reason)
    }

    pub fn forbidden(task_id: &str) -> Self {
        Self::new(
            ErrorCode::Forbidden,
            format!("Task {} belongs to another user", task_id),
        )
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn subtask_not_found(subtask_id: &str) -> Self {
        Self::new(
            ErrorCode::SubtaskNotFound,
            format!("Subtask not found: {}", subtask_id),
        )
    }

    pub fn user_not_found(user_id: &str) -> Self {
        Self::new(
            ErrorCode::UserNotFound,
            format!("User not found: {}", user_id),
        )
    }

    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "Request failed");
        }
        let body = json!({
            "code": self.code,
            "message": self.message,
            "field": self.field,
        });
        (status, Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
