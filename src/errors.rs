//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Every error body has the shape
//! `{"message": ...}` where `message` is either a string or a map of
//! field name to list of messages.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::{duplicate_email_message, MSG_USER_NOT_FOUND};

/// Field name to list of validation messages, ordered by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    // Validation
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error message payload: a plain string or per-field messages.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorMessage {
    Text(String),
    Fields(FieldErrors),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: ErrorMessage,
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn message(self) -> ErrorMessage {
        match self {
            AppError::Validation(fields) => ErrorMessage::Fields(fields),
            AppError::BadRequest(msg) => ErrorMessage::Text(msg),
            AppError::DuplicateEmail(email) => ErrorMessage::Text(duplicate_email_message(&email)),
            AppError::NotFound => ErrorMessage::Text(MSG_USER_NOT_FOUND.to_string()),

            // Hide details for internal errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorMessage::Text("A database error occurred".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorMessage::Text("An internal error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    /// Single-field validation error.
    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), vec![msg.into()]);
        AppError::Validation(fields)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
