//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lesson_core::GradeError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Grading error: {0}")]
    Grade(#[from] GradeError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Grade(_) => (StatusCode::UNPROCESSABLE_ENTITY, "grade_error"),
        };

        tracing::debug!(error = %self, status = status.as_u16(), "request rejected");

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::ComponentKind;

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("component-7".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::BadRequest("empty content".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_grade_error_status() {
        let error = ApiError::from(GradeError::KindMismatch {
            expected: ComponentKind::Quiz,
            submitted: ComponentKind::Exercise,
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_error_display_grade() {
        let error = ApiError::from(GradeError::KindMismatch {
            expected: ComponentKind::Quiz,
            submitted: ComponentKind::Exercise,
        });
        assert_eq!(
            error.to_string(),
            "Grading error: submission for exercise cannot be graded against a quiz component"
        );
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::NotFound("component component-3".to_string());
        assert_eq!(error.to_string(), "Not found: component component-3");
    }
}
