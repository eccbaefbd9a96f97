//! HTTP rendering of task-list errors.
//!
//! # Design
//! Input problems become 400 with a `detail` message naming the offending
//! value and the accepted set; a todo outside the caller's scope is 404.
//! Store failures are logged and answered with an opaque 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tasklist_core::Error as CoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The `user-id` header was absent or not valid UTF-8.
    #[error("missing or invalid `user-id` header")]
    MissingOwner,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingOwner => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
