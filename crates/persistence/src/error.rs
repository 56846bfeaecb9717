//! Error types for the persistence layer.
//!
//! Errors are grouped by who is at fault: the entity lookups
//! ([`ResourceError`]), the caller's input ([`ValidationError`]) and the
//! datastore itself ([`BackendError`]). Nothing in this crate retries; a
//! backend failure propagates unchanged to the caller.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Client input errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Datastore communication errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StorageError::Resource(ResourceError::NotFound { entity, id })
    }

    /// Returns true if this error means the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }
}

/// Errors related to entity state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness constraint was violated.
    #[error("{entity} already exists: {detail}")]
    AlreadyExists { entity: &'static str, detail: String },
}

/// Errors caused by malformed or referentially invalid input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A search parameter could not be parsed.
    #[error("invalid search parameter '{parameter}': {message}")]
    InvalidSearchParameter { parameter: String, message: String },

    /// A referenced category does not exist.
    #[error("category does not exist: {category_id}")]
    UnknownCategory { category_id: i64 },

    /// A field of a submitted entity is invalid.
    #[error("invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored row could not be decoded.
    #[error("row decode error: {message}")]
    RowDecode { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}
