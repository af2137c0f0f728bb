//! HTTP error responses
//!
//! Every failure leaves the service as `{"error": "<message>"}` with a
//! status code matching the error class.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API clients
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request has no usable `fen` field
    #[error("missing fen")]
    MissingFen,

    /// `fen` was rejected by the rules engine
    #[error("invalid fen: {0}")]
    InvalidFen(String),

    /// A required library is not compiled into this build
    #[error("{0} not installed on server")]
    DependencyUnavailable(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFen | ApiError::InvalidFen(_) => StatusCode::BAD_REQUEST,
            ApiError::DependencyUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for request handling
pub type ApiResult<T> = Result<T, ApiError>;
