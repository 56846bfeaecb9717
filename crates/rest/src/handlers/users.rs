//! User account handlers: register, login, logout, view and edit.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use petitio_persistence::core::PlatformStorage;
use petitio_persistence::error::ValidationError;
use petitio_persistence::types::{NewUser, PrivateUser, PublicUser, UserUpdate};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{RestError, RestResult};
use crate::extractors::{AuthenticatedUser, JsonBody, MaybeUser, PathId};
use crate::handlers::petitions::require_text;
use crate::passwords::{hash_password, verify_password};
use crate::state::AppState;

/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PATCH /users/{id}`. Every field is optional, but `password` and
/// `currentPassword` must be sent together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub current_password: Option<String>,
}

/// Handler for registering a new account.
///
/// # HTTP Request
///
/// `POST [base]/users/register`
///
/// # Response
///
/// - `201 Created` - `{"userId": n}`
/// - `400 Bad Request` - Invalid email, short password or blank names
/// - `403 Forbidden` - Email already in use
pub async fn register_handler<S>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    require_text("firstName", &body.first_name)?;
    require_text("lastName", &body.last_name)?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let storage = state.storage();
    if storage.email_in_use(&body.email, None).await? {
        return Err(RestError::forbidden("Email already in use"));
    }

    let password = hash_password(body.password, state.bcrypt_cost()).await?;
    let user_id = storage
        .create_user(NewUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password,
        })
        .await?;

    info!(user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "userId": user_id })),
    )
        .into_response())
}

/// Handler for logging in.
///
/// # HTTP Request
///
/// `POST [base]/users/login`
///
/// # Response
///
/// - `200 OK` - `{"userId": n, "token": "..."}`
/// - `401 Unauthorized` - Unknown email or wrong password
pub async fn login_handler<S>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let storage = state.storage();
    let Some(user) = storage.find_user_by_email(&body.email).await? else {
        debug!("Login for unknown email");
        return Err(incorrect_credentials());
    };

    if !verify_password(body.password, user.password.clone()).await? {
        debug!(user_id = user.id, "Login with wrong password");
        return Err(incorrect_credentials());
    }

    let token = Uuid::new_v4().simple().to_string();
    storage.set_auth_token(user.id, Some(&token)).await?;

    debug!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "userId": user.id, "token": token })),
    )
        .into_response())
}

/// Handler for logging out. Clears the caller's session token.
///
/// `POST [base]/users/logout`
pub async fn logout_handler<S>(
    State(state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    state.storage().set_auth_token(user.id(), None).await?;
    debug!(user_id = user.id(), "User logged out");

    Ok(StatusCode::OK.into_response())
}

/// Handler for viewing a user.
///
/// # HTTP Request
///
/// `GET [base]/users/{id}`
///
/// # Response
///
/// - `200 OK` - Names, plus `email` when the caller is that user
/// - `404 Not Found` - No such user
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    viewer: MaybeUser,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let user = state
        .storage()
        .read_user(id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No user with id {}", id)))?;

    if viewer.id() == Some(user.id) {
        Ok((StatusCode::OK, Json(PrivateUser::from(&user))).into_response())
    } else {
        Ok((StatusCode::OK, Json(PublicUser::from(&user))).into_response())
    }
}

/// Handler for editing the caller's own profile.
///
/// # HTTP Request
///
/// `PATCH [base]/users/{id}`
///
/// # Response
///
/// - `200 OK` - Updated
/// - `400 Bad Request` - Invalid field, or only one of the password fields
/// - `401 Unauthorized` - No session, or wrong `currentPassword`
/// - `403 Forbidden` - Another user, email in use, or unchanged password
/// - `404 Not Found` - No such user
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    PathId(id): PathId,
    caller: AuthenticatedUser,
    JsonBody(body): JsonBody<EditUserRequest>,
) -> RestResult<Response>
where
    S: PlatformStorage,
{
    let storage = state.storage();
    let user = storage
        .read_user(id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("No user with id {}", id)))?;

    if caller.id() != user.id {
        return Err(RestError::forbidden(
            "Can not edit another user's information",
        ));
    }

    if let Some(first_name) = &body.first_name {
        require_text("firstName", first_name)?;
    }
    if let Some(last_name) = &body.last_name {
        require_text("lastName", last_name)?;
    }
    if let Some(email) = &body.email {
        validate_email(email)?;
        if storage.email_in_use(email, Some(id)).await? {
            return Err(RestError::forbidden("Email is already in use"));
        }
    }

    let password = match (body.password, body.current_password) {
        (None, None) => None,
        (Some(new), Some(current)) => {
            validate_password(&new)?;
            if new == current {
                return Err(RestError::forbidden("Identical current and new passwords"));
            }
            if !verify_password(current, user.password.clone()).await? {
                return Err(RestError::Unauthorized {
                    message: "Invalid currentPassword".to_string(),
                });
            }
            Some(hash_password(new, state.bcrypt_cost()).await?)
        }
        _ => {
            return Err(RestError::bad_request(
                "password and currentPassword must be supplied together",
            ));
        }
    };

    storage
        .update_user(
            id,
            UserUpdate {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                password,
            },
        )
        .await?;

    debug!(user_id = id, "User updated");

    Ok(StatusCode::OK.into_response())
}

fn incorrect_credentials() -> RestError {
    RestError::Unauthorized {
        message: "Incorrect email/password".to_string(),
    }
}

fn validate_email(email: &str) -> RestResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.trim().is_empty() && !domain.trim().is_empty());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidField {
            field: "email".to_string(),
            message: "must be an email address".to_string(),
        }
        .into())
    }
}

fn validate_password(password: &str) -> RestResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidField {
            field: "password".to_string(),
            message: format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        }
        .into());
    }
    Ok(())
}
