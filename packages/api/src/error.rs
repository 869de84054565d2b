//! # Error kinds returned by the services and their HTTP mapping
//!
//! Every fallible service call returns [`ApiError`]. Callers branch on the
//! variant; the message is only what the client gets to read.
//!
//! | Variant | Status |
//! |---------|--------|
//! | [`Validation`](ApiError::Validation), [`DuplicateEmail`](ApiError::DuplicateEmail) | 400 |
//! | [`InvalidCredentials`](ApiError::InvalidCredentials), [`InvalidToken`](ApiError::InvalidToken), [`Forbidden`](ApiError::Forbidden) | 401 |
//! | [`NotFound`](ApiError::NotFound) | 404 |
//! | [`Store`](ApiError::Store), [`Internal`](ApiError::Internal) | 500 |
//!
//! Server-side failures are logged with `tracing::error!` and replaced by a
//! generic message in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password. Deliberately the same for both.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, tampered or expired session token.
    #[error("Not authorized")]
    InvalidToken,

    /// The caller does not own the note.
    #[error("User not authorized")]
    Forbidden,

    #[error("Note not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            // Not distinguished from unauthenticated on the wire.
            ApiError::InvalidCredentials | ApiError::InvalidToken | ApiError::Forbidden => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Server Error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
