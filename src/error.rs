use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{auth::AuthError, repository::RepoError, storage::UploadError};

/// ApiError
///
/// The boundary error type. Every handler returns `Result<_, ApiError>`; service errors convert
/// into it via `From`, and this is the only place that chooses an HTTP status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body, id or upload. 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, wrong or expired credentials. 401. Never says which check failed.
    #[error("unauthorized")]
    Unauthorized,

    /// 404.
    #[error("{0}")]
    NotFound(&'static str),

    /// Anything the caller cannot fix. 500. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ApiError::NotFound("post not found"),
            // Context was already logged by the repository.
            RepoError::Storage(_) => ApiError::Internal("storage failure".to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => ApiError::Unauthorized,
            AuthError::Signing | AuthError::Hashing(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge { .. } | UploadError::ExtensionNotAllowed(_) => {
                ApiError::Validation(err.to_string())
            }
            UploadError::Io(e) => ApiError::Internal(format!("upload i/o: {e}")),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::Validation("invalid post id".to_string())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(_: MultipartRejection) -> Self {
        ApiError::Validation("expected a multipart/form-data body".to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::Validation("file too large".to_string()),
            _ => ApiError::Validation("invalid multipart payload".to_string()),
        }
    }
}
