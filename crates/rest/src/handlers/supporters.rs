//! Supporter handlers: list a petition's pledges and pledge support.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use petitio_persistence::core::PlatformStorage;
use petitio_persistence::types::NewPledge;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::{AuthenticatedUser, JsonBody, PathId};
use crate::state::AppState;

/// Handler for listing a petition's supporters, newest first.
///
/// # HTTP Request
///
/// `GET [base]/petitions/{id}/supporters`
///
/// # Response
///
/// - `200 OK` - Supporter list (possibly empty)
/// - `404 Not Found` - No such petition
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    PathId(petition_id): PathId,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let storage = state.storage();
    if storage.read_petition(petition_id).await?.is_none() {
        return Err(RestError::not_found(format!(
            "No petition with id {}",
            petition_id
        )));
    }

    let supporters = storage.list_supporters(petition_id).await?;
    debug!(petition_id, count = supporters.len(), "Listed supporters");

    Ok((StatusCode::OK, Json(supporters)).into_response())
}

/// Handler for supporting a petition at one of its tiers.
///
/// # HTTP Request
///
/// `POST [base]/petitions/{id}/supporters`
///
/// # Response
///
/// - `201 Created` - Pledge recorded
/// - `403 Forbidden` - Own petition, or already supporting at this tier
/// - `404 Not Found` - No such petition, or the tier is not on it
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    PathId(petition_id): PathId,
    user: AuthenticatedUser,
    JsonBody(pledge): JsonBody<NewPledge>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let storage = state.storage();
    let petition = storage
        .read_petition(petition_id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No petition with id {}", petition_id)))?;

    let tier_id = pledge.support_tier_id;
    let on_petition = storage
        .read_support_tier(tier_id)
        .await?
        .is_some_and(|tier| tier.petition_id == petition_id);
    if !on_petition {
        return Err(RestError::not_found(format!(
            "No support tier {} on petition {}",
            tier_id, petition_id
        )));
    }

    if petition.owner_id == user.id() {
        return Err(RestError::forbidden("Cannot support your own petition"));
    }
    if storage
        .find_pledge(petition_id, tier_id, user.id())
        .await?
        .is_some()
    {
        return Err(RestError::forbidden("Already supported at this tier"));
    }

    let support_id = storage
        .add_pledge(petition_id, user.id(), pledge, Utc::now())
        .await?;
    info!(petition_id, tier_id, support_id, "Pledge recorded");

    Ok(StatusCode::CREATED.into_response())
}
