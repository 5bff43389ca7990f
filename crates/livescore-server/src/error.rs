//! API error responses.
//!
//! Every failed request is answered with a JSON body of the shape
//! `{"error": "<message>"}` and a status code matching the failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use livescore_core::{HubClosedError, RepoError};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request lacked a valid admin token.
    #[error("Invalid or missing admin token")]
    Unauthorized,

    /// The repository refused the operation.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// The hub no longer accepts subscribers.
    #[error("Server is shutting down")]
    ShuttingDown(#[from] HubClosedError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Repo(RepoError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Repo(RepoError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::ShuttingDown(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = %status, error = %self, "Request rejected");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
