//! Axum extractors for Petitio requests.
//!
//! - [`AuthenticatedUser`] / [`MaybeUser`] - session user from `X-Authorization`
//! - [`JsonBody`] - JSON request body with 400 rejections
//! - [`PathId`] / [`TierPath`] - validated numeric path segments
//! - [`SearchQuery`] - petition search parameters

mod auth;
mod json_body;
mod path_ids;
mod search_query;

pub use auth::{AuthenticatedUser, MaybeUser, X_AUTHORIZATION};
pub use json_body::JsonBody;
pub use path_ids::{PathId, TierPath};
pub use search_query::SearchQuery;
