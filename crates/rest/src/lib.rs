//! # petitio-rest - Petition Platform REST API
//!
//! HTTP surface of the Petitio petition and crowdfunding platform, built on
//! axum. Users register and log in, create petitions with up to three
//! support tiers, and pledge support at a tier. Petitions can be searched
//! with free text, owner, supporter, maximum supporting cost and category
//! filters, sorted and windowed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use petitio_rest::{create_app_with_config, ServerConfig};
//! use petitio_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("petitio.db")?;
//!     backend.init_schema()?;
//!
//!     let config = ServerConfig::default();
//!     let addr = config.socket_addr();
//!     let app = create_app_with_config(backend, config);
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! All routes are mounted under the configured base path (default `/api/v1`).
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | search petitions | GET | `/petitions?params` |
//! | create petition | POST | `/petitions` |
//! | categories | GET | `/petitions/categories` |
//! | read / edit / delete petition | GET, PATCH, DELETE | `/petitions/{id}` |
//! | petition image | GET, PUT | `/petitions/{id}/image` |
//! | add tier | PUT | `/petitions/{id}/supportTiers` |
//! | edit / remove tier | PATCH, DELETE | `/petitions/{id}/supportTiers/{tierId}` |
//! | supporters | GET, POST | `/petitions/{id}/supporters` |
//! | register / login / logout | POST | `/users/register`, `/users/login`, `/users/logout` |
//! | view / edit user | GET, PATCH | `/users/{id}` |
//! | user image | GET, PUT, DELETE | `/users/{id}/image` |
//! | health | GET | `/health` |
//!
//! Authenticated routes read the session token from `X-Authorization`.
//!
//! ## Error Handling
//!
//! Errors are JSON bodies `{"error": {"status": <code>, "message": <text>}}`:
//!
//! | HTTP Status | Meaning |
//! |-------------|---------|
//! | 400 | Malformed input or failed validation |
//! | 401 | Missing or unknown session token, bad credentials |
//! | 403 | Not permitted, or a uniqueness rule was violated |
//! | 404 | Entity not found |
//! | 500 | Internal server error |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and response mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration, images)
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Session, body, path and search extractors
//! - [`images`] - On-disk image store
//! - [`passwords`] - bcrypt hashing
//! - [`routing`] - Route configuration

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod images;
pub mod passwords;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use petitio_persistence::core::PlatformStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
pub fn create_app<S>(storage: S) -> Router
where
    S: PlatformStorage,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use petitio_rest::{create_app_with_config, ServerConfig};
/// use petitio_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// backend.init_schema()?;
/// let app = create_app_with_config(backend, ServerConfig::for_testing());
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: PlatformStorage,
{
    create_app_with_state(AppState::new(Arc::new(storage), config))
}

/// Creates the Axum application around existing state.
///
/// Useful when the caller keeps its own handle on the storage backend.
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: PlatformStorage,
{
    let config = state.config().clone();

    info!(
        backend = state.storage().name(),
        base_path = %config.base_path,
        "Creating REST API server"
    );

    let routes = routing::create_routes(state);

    // axum refuses to nest at the root
    let router = match config.normalized_base_path() {
        "" => routes,
        base => Router::new().nest(base, routes),
    };

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .map_response(axum::response::IntoResponse::into_response)
        .layer(RequestBodyLimitLayer::new(config.max_body_size));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence; otherwise both Petitio crates log at
/// `level`. Call once at startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "petitio_rest={level},petitio_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
