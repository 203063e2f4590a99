//! Service error types with HTTP status code mapping.
//!
//! [`ChatError`] is the central error type for the REST and service layers.
//! Each variant maps to a specific HTTP status code and structured JSON error
//! response. Transport failures inside WebSocket connections never become a
//! `ChatError`; they are handled locally by the connection paths.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "room not found: 4f9c…",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ChatError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2099 | Not Found       | 404 Not Found                |
/// | 2100–2199 | Conflict        | 409 Conflict                 |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Message content was empty or whitespace only.
    #[error("message content cannot be empty")]
    EmptyContent,

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Room with the given ID was not found.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Another user already registered this username.
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    /// Another room already uses this name.
    #[error("room name already exists: {0}")]
    RoomNameTaken(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EmptyContent => 1002,
            Self::UserNotFound(_) => 2001,
            Self::RoomNotFound(_) => 2002,
            Self::UsernameTaken(_) => 2101,
            Self::RoomNameTaken(_) => 2102,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::EmptyContent => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_) | Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::UsernameTaken(_) | Self::RoomNameTaken(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
