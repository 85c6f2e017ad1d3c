//! API error type mapped onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("participant name is required")]
    MissingName,

    #[error("a valid score is required")]
    InvalidScore,

    #[error("participant not found: {0}")]
    UnknownId(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingName | ApiError::InvalidScore => StatusCode::BAD_REQUEST,
            ApiError::UnknownId(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Storage(_)) {
            tracing::error!("Request failed: {self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
