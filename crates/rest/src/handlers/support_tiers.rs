//! Support tier handlers.
//!
//! Tiers can only be changed by the petition's owner, and a tier that
//! already has supporters is frozen.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use petitio_persistence::core::PlatformStorage;
use petitio_persistence::types::{NewSupportTier, StoredSupportTier, SupportTierUpdate};
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::{AuthenticatedUser, JsonBody, PathId, TierPath};
use crate::handlers::petitions::{MAX_SUPPORT_TIERS, owned_petition, validate_tier_fields};
use crate::state::AppState;

/// Handler for adding a tier to a petition.
///
/// # HTTP Request
///
/// `PUT [base]/petitions/{id}/supportTiers`
///
/// # Response
///
/// - `201 Created` - Tier added
/// - `403 Forbidden` - Not the owner, three tiers exist, or title taken
/// - `404 Not Found` - No such petition
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    PathId(petition_id): PathId,
    user: AuthenticatedUser,
    JsonBody(tier): JsonBody<NewSupportTier>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(petition_id, title = %tier.title, "Processing support tier create");

    let storage = state.storage();
    owned_petition(storage, petition_id, &user).await?;
    validate_tier_fields(Some(&tier.title), Some(&tier.description), Some(tier.cost))?;

    if storage.count_support_tiers(petition_id).await? >= MAX_SUPPORT_TIERS as i64 {
        return Err(RestError::forbidden(format!(
            "Can't add a support tier if {} already exist",
            MAX_SUPPORT_TIERS
        )));
    }
    if storage
        .tier_title_taken(petition_id, &tier.title, None)
        .await?
    {
        return Err(RestError::forbidden(
            "Support title not unique within petition",
        ));
    }

    let tier_id = storage.create_support_tier(petition_id, tier).await?;
    debug!(petition_id, tier_id, "Support tier created");

    Ok(StatusCode::CREATED.into_response())
}

/// Handler for editing a tier.
///
/// # HTTP Request
///
/// `PATCH [base]/petitions/{id}/supportTiers/{tierId}`
///
/// # Response
///
/// - `200 OK` - Updated
/// - `403 Forbidden` - Not the owner, tier has supporters, or title taken
/// - `404 Not Found` - No such petition, or the tier is not on it
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    path: TierPath,
    user: AuthenticatedUser,
    JsonBody(update): JsonBody<SupportTierUpdate>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(
        petition_id = path.petition_id,
        tier_id = path.tier_id,
        "Processing support tier update"
    );

    let storage = state.storage();
    owned_petition(storage, path.petition_id, &user).await?;
    let tier = tier_on_petition(storage, path).await?;

    validate_tier_fields(
        update.title.as_deref(),
        update.description.as_deref(),
        update.cost,
    )?;

    if storage.tier_has_supporters(tier.id).await? {
        return Err(RestError::forbidden(
            "Can not edit a support tier if a supporter already exists for it",
        ));
    }
    if let Some(title) = &update.title {
        if storage
            .tier_title_taken(path.petition_id, title, Some(tier.id))
            .await?
        {
            return Err(RestError::forbidden(
                "Support title not unique within petition",
            ));
        }
    }

    storage.update_support_tier(tier.id, update).await?;

    Ok(StatusCode::OK.into_response())
}

/// Handler for removing a tier.
///
/// # HTTP Request
///
/// `DELETE [base]/petitions/{id}/supportTiers/{tierId}`
///
/// # Response
///
/// - `200 OK` - Removed
/// - `403 Forbidden` - Not the owner, tier has supporters, or it is the only tier
/// - `404 Not Found` - No such petition, or the tier is not on it
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    path: TierPath,
    user: AuthenticatedUser,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(
        petition_id = path.petition_id,
        tier_id = path.tier_id,
        "Processing support tier delete"
    );

    let storage = state.storage();
    owned_petition(storage, path.petition_id, &user).await?;
    let tier = tier_on_petition(storage, path).await?;

    if storage.tier_has_supporters(tier.id).await? {
        return Err(RestError::forbidden(
            "Can not delete a support tier if a supporter already exists for it",
        ));
    }
    if storage.count_support_tiers(path.petition_id).await? <= 1 {
        return Err(RestError::forbidden(
            "Can not remove a support tier if it is the only one for a petition",
        ));
    }

    storage.delete_support_tier(tier.id).await?;

    Ok(StatusCode::OK.into_response())
}

async fn tier_on_petition<S>(storage: &S, path: TierPath) -> RestResult<StoredSupportTier>
where
    S: PlatformStorage,
{
    storage
        .read_support_tier(path.tier_id)
        .await?
        .filter(|tier| tier.petition_id == path.petition_id)
        .ok_or_else(|| {
            RestError::not_found(format!(
                "No support tier {} on petition {}",
                path.tier_id, path.petition_id
            ))
        })
}
