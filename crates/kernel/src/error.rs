//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::cache::SharedError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The content source failed while loading a collection.
    #[error("content source unavailable")]
    Upstream(SharedError),
}

impl From<SharedError> for AppError {
    fn from(e: SharedError) -> Self {
        AppError::Upstream(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "internal server error");
                "internal server error".to_string()
            }
            AppError::Upstream(e) => {
                tracing::error!(error = %format!("{e:#}"), "content source error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
