//! Error types for the Petitio REST API.
//!
//! Every handler returns [`RestResult`]; failures render as a JSON body of
//! the form `{"error": {"status": <code>, "message": <text>}}`.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer map onto HTTP statuses:
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | ValidationError | 400 |
//! | NotFound | 404 |
//! | AlreadyExists | 403 |
//! | BackendError | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use petitio_persistence::error::{BackendError, ResourceError, StorageError, ValidationError};
use std::fmt;
use tracing::error;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Malformed or invalid input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Missing or unknown session token, or bad credentials (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The caller may not perform the action (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Entity not found (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },

    /// The datastore cannot serve requests (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },
}

impl RestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        RestError::Unauthorized {
            message: "Unauthorized".to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        RestError::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        RestError::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RestError::InternalError {
            message: message.into(),
        }
    }

    /// The HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message }
            | RestError::Unauthorized { message }
            | RestError::Forbidden { message }
            | RestError::NotFound { message }
            | RestError::InternalError { message }
            | RestError::ServiceUnavailable { message } => message,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = error_body(status, self.message());
        (status, Json(body)).into_response()
    }
}

/// Builds the JSON error envelope.
pub fn error_body(status: StatusCode, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "status": status.as_u16(),
            "message": message
        }
    })
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            // Uniqueness violations are refused rather than reported as conflicts.
            ResourceError::AlreadyExists { .. } => RestError::Forbidden {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        error!(error = %err, "Storage backend failure");
        RestError::InternalError {
            message: "Internal Server Error".to_string(),
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_bad_request() {
        let err: RestError = StorageError::Validation(ValidationError::InvalidSearchParameter {
            parameter: "ownerId".to_string(),
            message: "must be a non-negative integer".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("ownerId"));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: RestError = StorageError::not_found("petition", 7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_already_exists_maps_to_403() {
        let err: RestError = StorageError::Resource(ResourceError::AlreadyExists {
            entity: "petition",
            detail: "title".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_backend_error_hides_cause() {
        let err: RestError = StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("pool"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body(StatusCode::FORBIDDEN, "Forbidden");
        assert_eq!(body["error"]["status"], 403);
        assert_eq!(body["error"]["message"], "Forbidden");
    }
}
