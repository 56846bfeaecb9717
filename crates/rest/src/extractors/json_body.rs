//! JSON request body extractor.
//!
//! Deserializes the body into a request type, reporting malformed JSON and
//! missing or mistyped fields as a 400 with the standard error envelope.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// Axum extractor for a JSON request body.
///
/// # Example
///
/// ```rust,ignore
/// use petitio_rest::extractors::JsonBody;
///
/// async fn handler(JsonBody(body): JsonBody<LoginRequest>) {
///     println!("{}", body.email);
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    /// Consumes the extractor and returns the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::bad_request(e.body_text()))?;

        parse_json(&bytes).map(JsonBody)
    }
}

fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RestError> {
    serde_json::from_slice(bytes).map_err(|e| RestError::bad_request(format!("Invalid JSON: {}", e)))
}
