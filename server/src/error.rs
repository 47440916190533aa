//! API errors and their JSON rendering.
//!
//! Every error becomes `{"message": "<text>"}` with a status picked from the
//! variant. Server-side failures are logged before they are returned.

use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use todo_core::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body was not a JSON todo payload.
    #[error("invalid request body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Refused before reaching a handler: unreadable path or body, oversized
    /// body, unknown route or method.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::InvalidIdentifier(_)) | Self::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(StoreError::Unavailable(_) | StoreError::Timeout { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, "store operation failed");
        } else {
            tracing::debug!(error = %message, "rejected request");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
