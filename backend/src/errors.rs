//! Error taxonomy shared by every handler and the workflow core.
//!
//! Handlers return `Result<HttpResponse, ApiError>`; the `ResponseError`
//! impl turns each variant into the JSON envelope
//! `{"status": "error", "message": ..., "data": []}` with the matching
//! HTTP status code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, rejected before any state change.
    #[error("{0}")]
    Validation(String),

    /// No valid session for the request.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to perform the action.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or reference conflict (duplicate email, role in use).
    #[error("{0}")]
    Conflict(String),

    /// Flow definition or role directory misconfiguration discovered while
    /// routing a workflow. The submission is left untouched.
    #[error("{0}")]
    Config(String),

    #[error("database error")]
    Database(#[from] rusqlite::Error),
}

impl ApiError {
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(e) => {
                error!("database error: {e}");
                "An internal error occurred".to_string()
            }
            ApiError::Config(msg) => {
                error!("workflow configuration error: {msg}");
                self.to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Config(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.public_message(),
            "data": [],
        }))
    }
}
