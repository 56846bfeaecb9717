//! Petition handlers: search, create, read, edit, delete and categories.

use std::collections::HashSet;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use petitio_persistence::core::PlatformStorage;
use petitio_persistence::detail::petition_detail;
use petitio_persistence::error::ValidationError;
use petitio_persistence::search::search_petitions;
use petitio_persistence::types::{NewPetition, NewSupportTier, Petition, PetitionUpdate};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::{AuthenticatedUser, JsonBody, PathId, SearchQuery};
use crate::state::AppState;

/// Most tiers a petition may have.
pub const MAX_SUPPORT_TIERS: usize = 3;

/// Body of `POST /petitions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetitionRequest {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub support_tiers: Vec<NewSupportTier>,
}

/// Handler for petition search.
///
/// # HTTP Request
///
/// `GET [base]/petitions?q=&ownerId=&supporterId=&supportingCost=&categoryIds=&sortBy=&startIndex=&count=`
///
/// # Response
///
/// - `200 OK` - `{"petitions": [...], "count": n}`
/// - `400 Bad Request` - Malformed parameter or unknown category
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    SearchQuery(raw): SearchQuery,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(params = ?raw, "Processing petition search");

    let page = search_petitions(state.storage(), raw).await?;

    Ok((StatusCode::OK, Json(page)).into_response())
}

/// Handler for creating a petition with its initial support tiers.
///
/// # HTTP Request
///
/// `POST [base]/petitions`
///
/// # Response
///
/// - `201 Created` - `{"petitionId": n}`
/// - `400 Bad Request` - Invalid fields, tier count or unknown category
/// - `401 Unauthorized` - No valid session
/// - `403 Forbidden` - Title already used by another petition
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<CreatePetitionRequest>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(owner_id = user.id(), title = %body.title, "Processing petition create");

    require_text("title", &body.title)?;
    require_text("description", &body.description)?;
    validate_initial_tiers(&body.support_tiers)?;

    let storage = state.storage();
    ensure_category(storage, body.category_id).await?;

    if storage.petition_title_taken(&body.title, None).await? {
        return Err(RestError::forbidden("Petition title already exists"));
    }

    let petition_id = storage
        .create_petition(NewPetition {
            title: body.title,
            description: body.description,
            creation_date: Utc::now(),
            owner_id: user.id(),
            category_id: body.category_id,
            support_tiers: body.support_tiers,
        })
        .await?;

    info!(petition_id, owner_id = user.id(), "Petition created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "petitionId": petition_id })),
    )
        .into_response())
}

/// Handler for reading a single petition.
///
/// # HTTP Request
///
/// `GET [base]/petitions/{id}`
///
/// # Response
///
/// - `200 OK` - Petition detail with tiers and funding totals
/// - `404 Not Found` - No such petition
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(petition_id = id, "Processing petition read");

    let detail = petition_detail(state.storage(), id).await?;

    Ok((StatusCode::OK, Json(detail)).into_response())
}

/// Handler for editing a petition.
///
/// # HTTP Request
///
/// `PATCH [base]/petitions/{id}`
///
/// # Response
///
/// - `200 OK` - Updated
/// - `400 Bad Request` - Invalid field or unknown category
/// - `403 Forbidden` - Not the owner, or title taken by another petition
/// - `404 Not Found` - No such petition
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    user: AuthenticatedUser,
    JsonBody(update): JsonBody<PetitionUpdate>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(petition_id = id, "Processing petition update");

    let storage = state.storage();
    owned_petition(storage, id, &user).await?;

    if let Some(title) = &update.title {
        require_text("title", title)?;
        if storage.petition_title_taken(title, Some(id)).await? {
            return Err(RestError::forbidden("Petition title already exists"));
        }
    }
    if let Some(description) = &update.description {
        require_text("description", description)?;
    }
    if let Some(category_id) = update.category_id {
        ensure_category(storage, category_id).await?;
    }

    if !update.is_empty() {
        storage.update_petition(id, update).await?;
    }

    Ok(StatusCode::OK.into_response())
}

/// Handler for deleting a petition and its support tiers.
///
/// # HTTP Request
///
/// `DELETE [base]/petitions/{id}`
///
/// # Response
///
/// - `200 OK` - Deleted
/// - `403 Forbidden` - Not the owner, or the petition has supporters
/// - `404 Not Found` - No such petition
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    user: AuthenticatedUser,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    debug!(petition_id = id, "Processing petition delete");

    let storage = state.storage();
    let petition = owned_petition(storage, id, &user).await?;

    if storage.funding_summary(id).await?.supporter_count > 0 {
        return Err(RestError::forbidden(
            "Can not delete a petition with one or more supporters",
        ));
    }

    storage.delete_petition(id).await?;

    if let Some(filename) = &petition.image_filename {
        state.images().remove(filename).await?;
    }

    info!(petition_id = id, "Petition deleted");

    Ok(StatusCode::OK.into_response())
}

/// Handler for listing petition categories.
///
/// # HTTP Request
///
/// `GET [base]/petitions/categories`
pub async fn categories_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let categories = state.storage().list_categories().await?;

    Ok((StatusCode::OK, Json(categories)).into_response())
}

/// Loads a petition and checks that `user` owns it.
pub(crate) async fn owned_petition<S>(
    storage: &S,
    id: i64,
    user: &AuthenticatedUser,
) -> RestResult<Petition>
where
    S: PlatformStorage,
{
    let petition = storage
        .read_petition(id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No petition with id {}", id)))?;

    if petition.owner_id != user.id() {
        return Err(RestError::forbidden(
            "Only the owner of a petition may modify it",
        ));
    }

    Ok(petition)
}

async fn ensure_category<S>(storage: &S, category_id: i64) -> RestResult<()>
where
    S: PlatformStorage,
{
    if storage.category_exists(category_id).await? {
        Ok(())
    } else {
        Err(ValidationError::UnknownCategory { category_id }.into())
    }
}

/// Rejects blank text fields.
pub(crate) fn require_text(field: &str, value: &str) -> RestResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Checks one tier's fields.
pub(crate) fn validate_tier_fields(
    title: Option<&str>,
    description: Option<&str>,
    cost: Option<i64>,
) -> RestResult<()> {
    if let Some(title) = title {
        require_text("title", title)?;
    }
    if let Some(description) = description {
        require_text("description", description)?;
    }
    if cost.is_some_and(|c| c < 0) {
        return Err(ValidationError::InvalidField {
            field: "cost".to_string(),
            message: "must be a non-negative integer".to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_initial_tiers(tiers: &[NewSupportTier]) -> RestResult<()> {
    if tiers.is_empty() || tiers.len() > MAX_SUPPORT_TIERS {
        return Err(ValidationError::InvalidField {
            field: "supportTiers".to_string(),
            message: format!("must contain between 1 and {} tiers", MAX_SUPPORT_TIERS),
        }
        .into());
    }

    let mut titles = HashSet::new();
    for tier in tiers {
        validate_tier_fields(Some(&tier.title), Some(&tier.description), Some(tier.cost))?;
        if !titles.insert(tier.title.as_str()) {
            return Err(ValidationError::InvalidField {
                field: "supportTiers".to_string(),
                message: format!("duplicate tier title '{}'", tier.title),
            }
            .into());
        }
    }
    Ok(())
}
