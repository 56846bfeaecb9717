//! Numeric path parameter extractors.
//!
//! Ids that are not non-negative integers are rejected with 400 before any
//! lookup happens.

use axum::{
    extract::{FromRequestParts, RawPathParams},
    http::request::Parts,
};

use crate::error::RestError;

/// The `{id}` segment of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

/// The `{id}` and `{tierId}` segments of a support tier route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPath {
    pub petition_id: i64,
    pub tier_id: i64,
}

fn parse_id(name: &str, value: &str) -> Result<i64, RestError> {
    match value.parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(RestError::bad_request(format!("Invalid {}: {}", name, value))),
    }
}

async fn path_param<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
    name: &str,
) -> Result<i64, RestError> {
    let params = RawPathParams::from_request_parts(parts, state)
        .await
        .map_err(|e| RestError::bad_request(e.body_text()))?;

    let value = params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .ok_or_else(|| RestError::bad_request(format!("Missing path parameter {}", name)))?;

    parse_id(name, value)
}

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_param(parts, state, "id").await.map(PathId)
    }
}

impl<S> FromRequestParts<S> for TierPath
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let petition_id = path_param(parts, state, "id").await?;
        let tier_id = path_param(parts, state, "tierId").await?;
        Ok(TierPath {
            petition_id,
            tier_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "0").unwrap(), 0);
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert!(parse_id("id", "-1").is_err());
        assert!(parse_id("id", "abc").is_err());
        assert!(parse_id("tierId", "1.5").is_err());
    }
}
