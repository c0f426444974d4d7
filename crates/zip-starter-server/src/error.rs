//! Error types for the zip-starter server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use zip_starter_core::StarterError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StarterError> for AppError {
    fn from(err: StarterError) -> Self {
        if err.is_client_error() {
            AppError::BadRequest(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, format!("{}\n", msg)).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error\n").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_is_bad_request() {
        let err = AppError::from(StarterError::MissingName);
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_copy_error_is_bad_request() {
        let err = AppError::from(StarterError::Copy {
            url: "https://example.com".to_string(),
            source: std::io::Error::other("reset"),
        });
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "error fetching url 'https://example.com': reset")
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_finalization_error_is_internal() {
        let err = AppError::from(StarterError::Finalization(
            zip::result::ZipError::FileNotFound,
        ));
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
