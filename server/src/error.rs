// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

// --- Custom Error Handling ---
// Turns service and extraction failures into failure envelopes with the
// matching HTTP status code.

use crate::service::ServiceError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{ApiResponse, ValidationError};

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    pub(crate) code: StatusCode,
    pub(crate) message: String,
    /// Underlying error text, rendered only in debug builds.
    pub(crate) detail: Option<String>,
}

impl AppError {
    pub fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            detail: None,
        }
    }

    pub fn not_found_route() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Route not found")
    }

    /// A 500 envelope. `detail` is only rendered in debug builds.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Server Error".to_string(),
            detail: Some(detail.into()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Validation(_) | ServiceError::InvalidIdentifier(_) => {
                Self::new(StatusCode::BAD_REQUEST, &message)
            }
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, &message),
            ServiceError::Store(e) => {
                // Log the internal error for debugging.
                tracing::error!("Internal server error: {:?}", e);
                Self::internal(format!("{e:#}"))
            }
        }
    }
}

/// Malformed JSON bodies become 400 envelopes instead of plain-text rejections.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let err = ValidationError::MalformedBody(rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, &err.to_string())
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        let mut body: ApiResponse<()> = ApiResponse::failure(self.message);
        if cfg!(debug_assertions) {
            body.error = self.detail;
        }
        (self.code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ServiceError::Validation(ValidationError::TitleRequired),
                StatusCode::BAD_REQUEST,
                "Please provide a task title",
            ),
            (
                ServiceError::InvalidIdentifier("abc".to_string()),
                StatusCode::BAD_REQUEST,
                "Invalid task ID",
            ),
            (
                ServiceError::NotFound(Uuid::nil()),
                StatusCode::NOT_FOUND,
                "Task not found",
            ),
            (
                ServiceError::Store(anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server Error",
            ),
        ];

        for (err, code, message) in cases {
            let app_err = AppError::from(err);
            assert_eq!(app_err.code, code);
            assert_eq!(app_err.message, message);
        }
    }

    #[test]
    fn test_store_error_keeps_detail() {
        let app_err = AppError::from(ServiceError::Store(
            anyhow::anyhow!("locked").context("Failed to insert task into DB"),
        ));
        assert_eq!(
            app_err.detail.as_deref(),
            Some("Failed to insert task into DB: locked")
        );
    }
}
