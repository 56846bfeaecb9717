//! Route table for the Petitio REST API.

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use petitio_persistence::core::PlatformStorage;

use crate::handlers::{self, images, petitions, support_tiers, supporters, users};
use crate::state::AppState;

/// Creates all REST API routes, relative to the base path.
///
/// # Routes
///
/// ## Petitions
/// - `GET /petitions` - Search
/// - `POST /petitions` - Create
/// - `GET /petitions/categories` - Categories
/// - `GET|PATCH|DELETE /petitions/{id}` - Read, edit, delete
/// - `GET|PUT /petitions/{id}/image` - Hero image
/// - `PUT /petitions/{id}/supportTiers` - Add tier
/// - `PATCH|DELETE /petitions/{id}/supportTiers/{tierId}` - Edit, remove tier
/// - `GET|POST /petitions/{id}/supporters` - List, pledge
///
/// ## Users
/// - `POST /users/register`, `POST /users/login`, `POST /users/logout`
/// - `GET|PATCH /users/{id}` - View, edit
/// - `GET|PUT|DELETE /users/{id}/image` - Profile image
///
/// ## Operational
/// - `GET /health` - Health check
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: PlatformStorage,
{
    Router::new()
        // Operational
        .route("/health", get(handlers::health_handler::<S>))
        // Petitions
        .route(
            "/petitions",
            get(petitions::search_handler::<S>).post(petitions::create_handler::<S>),
        )
        .route(
            "/petitions/categories",
            get(petitions::categories_handler::<S>),
        )
        .route(
            "/petitions/{id}",
            get(petitions::read_handler::<S>)
                .patch(petitions::update_handler::<S>)
                .delete(petitions::delete_handler::<S>),
        )
        .route(
            "/petitions/{id}/image",
            get(images::get_petition_image_handler::<S>)
                .put(images::put_petition_image_handler::<S>),
        )
        .route(
            "/petitions/{id}/supportTiers",
            put(support_tiers::create_handler::<S>),
        )
        .route(
            "/petitions/{id}/supportTiers/{tierId}",
            patch(support_tiers::update_handler::<S>)
                .delete(support_tiers::delete_handler::<S>),
        )
        .route(
            "/petitions/{id}/supporters",
            get(supporters::list_handler::<S>).post(supporters::create_handler::<S>),
        )
        // Users
        .route("/users/register", post(users::register_handler::<S>))
        .route("/users/login", post(users::login_handler::<S>))
        .route("/users/logout", post(users::logout_handler::<S>))
        .route(
            "/users/{id}",
            get(users::read_handler::<S>).patch(users::update_handler::<S>),
        )
        .route(
            "/users/{id}/image",
            get(images::get_user_image_handler::<S>)
                .put(images::put_user_image_handler::<S>)
                .delete(images::delete_user_image_handler::<S>),
        )
        .with_state(state)
}
