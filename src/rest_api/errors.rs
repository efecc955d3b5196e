//! # REST API Errors
//!
//! Maps validation and store outcomes onto HTTP status codes and JSON
//! error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::todo::ValidationError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Payload failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Path identifier required but absent
    #[error("Missing todo id")]
    MissingId,

    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Path segment could not be decoded
    #[error("Invalid path parameter: {0}")]
    InvalidPathParam(String),

    /// Limit exceeds maximum
    #[error("Limit {0} exceeds maximum {1}")]
    LimitExceeded(usize, usize),

    /// Referenced todo does not exist
    #[error("Todo not found")]
    NotFound(String),

    /// Create collided with an existing id
    #[error("Todo already exists")]
    Conflict(String),

    /// Route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Backend or runtime fault; the detail is reported as `message`
    #[error("Internal server error")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            RestError::Validation(_) => StatusCode::BAD_REQUEST,
            RestError::MissingId => StatusCode::BAD_REQUEST,
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidPathParam(_) => StatusCode::BAD_REQUEST,
            RestError::LimitExceeded(_, _) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            RestError::NotFound(_) => StatusCode::NOT_FOUND,

            // 405 Method Not Allowed
            RestError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 409 Conflict
            RestError::Conflict(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => RestError::Conflict(id),
            StoreError::NotFound(id) => RestError::NotFound(id),
            StoreError::Unavailable(detail) => RestError::Internal(detail),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_fields: Option<Vec<String>>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        let mut body = Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
            message: None,
            id: None,
            invalid_fields: None,
        };
        match err {
            RestError::Internal(detail) => body.message = Some(detail),
            RestError::NotFound(id) | RestError::Conflict(id) => body.id = Some(id),
            RestError::Validation(ValidationError::InvalidFields(fields)) => {
                body.invalid_fields = Some(fields)
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
