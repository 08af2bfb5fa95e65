//! Error types for PaperScope services
//!
//! Provides a centralized error model:
//! - One `AppError` enum for every failure mode
//! - A stable `ErrorKind` for machine-readable classification
//! - A single HTTP status translation point
//! - Redacted public messages for server-side failures; the full detail
//!   goes to the logs only

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Stable error classification exposed to clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Unavailable,
    Upstream,
    Database,
    Internal,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required parameter missing: {name}")]
    MissingParameter { name: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Resource not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    #[error("Duplicate resource: {message}")]
    Duplicate {
        message: String,
        duplicates: Vec<String>,
    },

    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Recommendation service error: {message}")]
    Recommendation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the stable kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } | AppError::MissingParameter { .. } => {
                ErrorKind::Validation
            }
            AppError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AppError::Forbidden { .. } => ErrorKind::Forbidden,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Duplicate { .. } => ErrorKind::Conflict,
            AppError::Unavailable { .. } => ErrorKind::Unavailable,
            AppError::Recommendation { .. } | AppError::HttpClient(_) => ErrorKind::Upstream,
            AppError::Database(_) | AppError::DatabaseConnection { .. } => ErrorKind::Database,
            AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Internal { .. }
            | AppError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            ErrorKind::Database | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to clients. Client errors carry their full text;
    /// server-side failures are redacted and only reach the logs.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            match self.kind() {
                ErrorKind::Database => "database error".to_string(),
                _ => "internal server error".to_string(),
            }
        } else {
            self.to_string()
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Attach structured details (e.g. conflicting titles) to the response
    pub fn into_response_with_details(self, details: serde_json::Value) -> Response {
        build_response(self, Some(details))
    }
}

fn build_response(err: AppError, details: Option<serde_json::Value>) -> Response {
    let status = err.status_code();
    let kind = err.kind();

    if err.is_server_error() {
        tracing::error!(
            error = %err,
            kind = ?kind,
            status = status.as_u16(),
            "Server error"
        );
    } else {
        tracing::warn!(
            error = %err,
            kind = ?kind,
            status = status.as_u16(),
            "Client error"
        );
    }

    metrics::counter!("paperscope_request_errors_total", "kind" => format!("{kind:?}"))
        .increment(1);

    let body = ErrorResponse {
        error: ErrorDetails {
            kind,
            message: err.public_message(),
            details,
        },
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        build_response(self, None)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status_mapping() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (
                AppError::MissingParameter {
                    name: "user_id".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Unauthorized {
                    message: "bad password".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Forbidden {
                    message: "not an author".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::NotFound {
                    resource: "paper".into(),
                    id: "P001".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Duplicate {
                    message: "duplicate titles".into(),
                    duplicates: vec!["Deep Learning Survey".into()],
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::Unavailable {
                    message: "recommendations not configured".into(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal {
                    message: "boom".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }

    #[test]
    fn test_server_errors_are_redacted() {
        let err = AppError::Internal {
            message: "SELECT failed: table Papers is locked".into(),
        };
        assert!(err.is_server_error());
        assert!(!err.public_message().contains("Papers"));
    }

    #[test]
    fn test_client_errors_keep_their_text() {
        let err = AppError::Duplicate {
            message: "duplicate (venue, title): Deep Learning Survey".into(),
            duplicates: vec!["Deep Learning Survey".into()],
        };
        assert!(err.is_client_error());
        assert!(err.public_message().contains("Deep Learning Survey"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_conflict_body_carries_duplicate_titles() {
        let body = ErrorResponse {
            error: ErrorDetails {
                kind: ErrorKind::Conflict,
                message: "duplicate (venue, title) pair(s)".into(),
                details: Some(serde_json::json!({
                    "duplicates": ["Deep Learning Survey"]
                })),
            },
        };
        let text = serde_json::to_string(&body).unwrap();
        assert!(text.contains("\"duplicates\""));
        assert!(text.contains("Deep Learning Survey"));
    }
}
