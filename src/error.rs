// Error handling for stencil

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::ClientError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The addressed template id does not exist.
    TemplateNotFound(String),
    /// A stored template is unusable as configured.
    Configuration(String),
    /// No anchor is configured for the template's model.
    AnchorNotFound(String),
    /// The tree store failed or answered with a non-success status.
    Backend {
        status: Option<u16>,
        message: String,
    },
    /// The backend response could not be reshaped.
    Transform(String),
    /// A request body failed validation; one detail per problem.
    Validation(Vec<String>),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::TemplateNotFound(msg) => write!(f, "Template not found: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::AnchorNotFound(msg) => write!(f, "Anchor not found: {}", msg),
            AppError::Backend { status: Some(code), message } => {
                write!(f, "Tree store error ({}): {}", code, message)
            }
            AppError::Backend { status: None, message } => {
                write!(f, "Tree store error: {}", message)
            }
            AppError::Transform(msg) => write!(f, "Transform error: {}", msg),
            AppError::Validation(details) => {
                write!(f, "Validation failed: {}", details.join("; "))
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Wire shape for error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub details: Vec<String>,
}

// Implement IntoResponse so Axum can convert errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::TemplateNotFound(msg) => {
                (StatusCode::NOT_FOUND, "Template not found", vec![msg])
            }
            AppError::Configuration(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Error while executing template",
                vec![msg],
            ),
            AppError::AnchorNotFound(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Error while executing template",
                vec![msg],
            ),
            AppError::Backend { status, message } => {
                let detail = match status {
                    Some(code) => format!("tree store responded with status {}: {}", code, message),
                    None => message,
                };
                (StatusCode::BAD_GATEWAY, "Error from tree store", vec![detail])
            }
            AppError::Transform(msg) => (
                StatusCode::BAD_GATEWAY,
                "Error transforming response",
                vec![msg],
            ),
            AppError::Validation(details) => {
                (StatusCode::BAD_REQUEST, "Validation failed", details)
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", vec![msg])
            }
        };

        let body = ErrorResponse {
            message: message.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

// Client failures carry the backend status through to the taxonomy
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Backend {
            status: err.status,
            message: err.message,
        }
    }
}

// Extension trait for database result handling
pub trait DbResultExt<T> {
    /// Convert database errors to AppError::Internal with "Database error: " prefix
    fn db_err(self) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> DbResultExt<T> for Result<T, E> {
    fn db_err(self) -> Result<T, AppError> {
        self.map_err(|e| AppError::Internal(format!("Database error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_backend_status() {
        let err = AppError::Backend {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_validation_display_joins_details() {
        let err = AppError::Validation(vec![
            "template id missing".to_string(),
            "model missing".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("template id missing"));
        assert!(text.contains("model missing"));
    }

    #[test]
    fn test_db_err_maps_to_internal() {
        let result: Result<(), &str> = Err("boom");
        let err = result.db_err().unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.to_string().contains("Database error"));
    }

    #[test]
    fn test_client_error_conversion_keeps_status() {
        let err: AppError = ClientError::status(404, "no such node".to_string()).into();
        match err {
            AppError::Backend { status, message } => {
                assert_eq!(status, Some(404));
                assert_eq!(message, "no such node");
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }
}
