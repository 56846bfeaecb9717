//! Route configuration for the Petitio REST API.

pub mod routes;

pub use routes::create_routes;
