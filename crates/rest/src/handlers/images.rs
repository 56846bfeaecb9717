//! Image handlers for petitions and users.
//!
//! Uploads are raw request bodies whose `Content-Type` must be
//! `image/png`, `image/jpeg` or `image/gif`.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use petitio_persistence::core::PlatformStorage;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::{AuthenticatedUser, PathId};
use crate::handlers::petitions::owned_petition;
use crate::images::{ImageFormat, ImageOwner};
use crate::state::AppState;

/// Handler for fetching a petition's hero image.
///
/// # HTTP Request
///
/// `GET [base]/petitions/{id}/image`
///
/// # Response
///
/// - `200 OK` - Image bytes with their content type
/// - `404 Not Found` - No such petition, or it has no image
pub async fn get_petition_image_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let petition = state
        .storage()
        .read_petition(id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No petition with id {}", id)))?;

    let filename = petition
        .image_filename
        .ok_or_else(|| RestError::not_found("Petition has no image"))?;

    serve_image(&state, &filename).await
}

/// Handler for setting a petition's hero image.
///
/// # HTTP Request
///
/// `PUT [base]/petitions/{id}/image`
///
/// # Response
///
/// - `201 Created` - First image set
/// - `200 OK` - Existing image replaced
/// - `400 Bad Request` - Unsupported content type or empty body
/// - `403 Forbidden` - Not the owner
/// - `404 Not Found` - No such petition
pub async fn put_petition_image_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let petition = owned_petition(state.storage(), id, &user).await?;
    let format = upload_format(&headers, &body)?;

    let previous = petition.image_filename.as_deref();
    let filename = state
        .images()
        .save(ImageOwner::Petition(id), format, &body, previous)
        .await?;
    state
        .storage()
        .set_petition_image(id, Some(&filename))
        .await?;

    Ok(replaced_or_created(previous.is_some()))
}

/// Handler for fetching a user's profile image.
///
/// # HTTP Request
///
/// `GET [base]/users/{id}/image`
///
/// # Response
///
/// - `200 OK` - Image bytes with their content type
/// - `404 Not Found` - No such user, or the user has no image
pub async fn get_user_image_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let filename = state
        .storage()
        .read_user(id)
        .await?
        .and_then(|user| user.image_filename)
        .ok_or_else(|| RestError::not_found("No user with specified ID, or user has no image"))?;

    serve_image(&state, &filename).await
}

/// Handler for setting the caller's profile image.
///
/// # HTTP Request
///
/// `PUT [base]/users/{id}/image`
///
/// # Response
///
/// - `201 Created` - First image set
/// - `200 OK` - Existing image replaced
/// - `400 Bad Request` - Unsupported content type or empty body
/// - `403 Forbidden` - Another user's image
/// - `404 Not Found` - No such user
pub async fn put_user_image_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    caller: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let user = state
        .storage()
        .read_user(id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No user with id {}", id)))?;
    if caller.id() != user.id {
        return Err(RestError::forbidden(
            "Can not change another user's profile photo",
        ));
    }
    let format = upload_format(&headers, &body)?;

    let previous = user.image_filename.as_deref();
    let filename = state
        .images()
        .save(ImageOwner::User(id), format, &body, previous)
        .await?;
    state.storage().set_user_image(id, Some(&filename)).await?;

    Ok(replaced_or_created(previous.is_some()))
}

/// Handler for removing the caller's profile image.
///
/// # HTTP Request
///
/// `DELETE [base]/users/{id}/image`
///
/// # Response
///
/// - `200 OK` - Removed
/// - `403 Forbidden` - Another user's image
/// - `404 Not Found` - No such user, or the user has no image
pub async fn delete_user_image_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    caller: AuthenticatedUser,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let user = state
        .storage()
        .read_user(id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No user with id {}", id)))?;
    if caller.id() != user.id {
        return Err(RestError::forbidden(
            "Can not delete another user's profile photo",
        ));
    }
    let filename = user
        .image_filename
        .ok_or_else(|| RestError::not_found("User has no image"))?;

    state.images().remove(&filename).await?;
    state.storage().set_user_image(id, None).await?;

    debug!(user_id = id, "User image removed");

    Ok(StatusCode::OK.into_response())
}

async fn serve_image<S>(state: &AppState<S>, filename: &str) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let (bytes, format) = state
        .images()
        .load(filename)
        .await?
        .ok_or_else(|| RestError::not_found("Image file is missing"))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, format.content_type())],
        bytes,
    )
        .into_response())
}

fn upload_format(headers: &HeaderMap, body: &Bytes) -> RestResult<ImageFormat> {
    let format = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(ImageFormat::from_content_type)
        .ok_or_else(|| {
            RestError::bad_request("Invalid image supplied (possibly incorrect file type)")
        })?;

    if body.is_empty() {
        return Err(RestError::bad_request("Image body is empty"));
    }

    Ok(format)
}

fn replaced_or_created(replaced: bool) -> Response {
    if replaced {
        StatusCode::OK.into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}
