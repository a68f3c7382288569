//! Townsquare: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use townsquare_core::error::DomainError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The town map could not be loaded or built.
    #[error("map error: {0}")]
    Map(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

/// Status code and machine-readable code for a domain error.
#[must_use]
pub fn classify(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::InvalidTownId(_) => (StatusCode::NOT_FOUND, "invalid_town_id"),
        DomainError::InvalidSessionToken => (StatusCode::FORBIDDEN, "invalid_session_token"),
        DomainError::InvalidInteractableId(_) => {
            (StatusCode::NOT_FOUND, "invalid_interactable_id")
        }
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::Geometry(_) => (StatusCode::UNPROCESSABLE_ENTITY, "geometry_error"),
        DomainError::Infrastructure(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = classify(&self.0);

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
