//! Session token extractors.
//!
//! A logged-in user sends the token issued at login in the
//! `X-Authorization` header. [`AuthenticatedUser`] rejects the request with
//! 401 when the token is missing or unknown; [`MaybeUser`] lets it through
//! anonymously instead.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, request::Parts},
};
use petitio_persistence::core::PlatformStorage;
use petitio_persistence::types::User;
use tracing::debug;

use crate::error::RestError;
use crate::state::AppState;

/// Header carrying the session token.
pub static X_AUTHORIZATION: HeaderName = HeaderName::from_static("x-authorization");

/// The user owning the request's session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// The session's user, if the request carries a valid token.
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(&X_AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn resolve_user<S: PlatformStorage>(
    parts: &Parts,
    state: &AppState<S>,
) -> Result<Option<User>, RestError> {
    let Some(token) = token_from_headers(&parts.headers) else {
        return Ok(None);
    };

    let user = state.storage().find_user_by_token(token).await?;
    if user.is_none() {
        debug!("Request carried an unknown session token");
    }
    Ok(user)
}

impl<S> FromRequestParts<AppState<S>> for AuthenticatedUser
where
    S: PlatformStorage,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(AuthenticatedUser)
            .ok_or_else(RestError::unauthorized)
    }
}

impl<S> FromRequestParts<AppState<S>> for MaybeUser
where
    S: PlatformStorage,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state).await.map(MaybeUser)
    }
}
