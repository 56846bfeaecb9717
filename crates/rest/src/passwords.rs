//! Password hashing.
//!
//! bcrypt is CPU bound, so both operations run on the blocking thread pool.

use tracing::error;

use crate::error::RestError;

/// Hashes a plaintext password with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, RestError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            RestError::internal("Internal Server Error")
        })?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            RestError::internal("Internal Server Error")
        })
}

/// Checks a plaintext password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, RestError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            RestError::internal("Internal Server Error")
        })
}
