// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::record::RecordError;
use crate::database::DatabaseError;
use crate::validation::ValidationError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// 401 and 500 responses carry no body so nothing about the key check or the
/// backend leaks to the caller.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    InvalidJson,
    Validation(ValidationError),

    // 401 Unauthorized
    Unauthorized,

    // 404 Not Found
    NotFound,

    // 500 Internal Server Error
    InternalServerError,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message, if this error has a body
    pub fn message(&self) -> Option<String> {
        match self {
            ApiError::InvalidJson => Some("Invalid JSON".to_string()),
            ApiError::Validation(e) => Some(e.to_string()),
            ApiError::NotFound => Some("Not found".to_string()),
            ApiError::Unauthorized | ApiError::InternalServerError => None,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Option<Value> {
        self.message().map(|message| json!({ "error": message }))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<RecordError> for ApiError {
    fn from(_: RecordError) -> Self {
        ApiError::InvalidJson
    }
}

impl From<DatabaseError> for ApiError {
    fn from(_: DatabaseError) -> Self {
        // Handlers log the underlying error with operation context
        ApiError::InternalServerError
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "{}", self.status_code()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self.to_json() {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}
