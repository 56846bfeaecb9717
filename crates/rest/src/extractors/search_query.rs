//! Petition search query extractor.
//!
//! Query strings are decoded pair by pair so that a repeated `categoryIds`
//! key accumulates into a list.

use axum::{extract::FromRequestParts, http::request::Parts};
use petitio_persistence::types::RawSearchParams;

/// Axum extractor for petition search parameters.
///
/// Never rejects; values are validated later by the search normalizer.
#[derive(Debug, Default)]
pub struct SearchQuery(pub RawSearchParams);

impl SearchQuery {
    /// Decodes a raw query string.
    pub fn from_query(query: &str) -> Self {
        SearchQuery(RawSearchParams::from_pairs(url::form_urlencoded::parse(
            query.as_bytes(),
        )))
    }

    pub fn into_inner(self) -> RawSearchParams {
        self.0
    }
}

impl<S> FromRequestParts<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(SearchQuery::from_query)
            .unwrap_or_default())
    }
}
