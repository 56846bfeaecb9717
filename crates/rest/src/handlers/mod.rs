//! HTTP request handlers.
//!
//! - [`petitions`] - search, create, read, edit, delete, categories
//! - [`support_tiers`] - add, edit and remove a petition's tiers
//! - [`supporters`] - list and add pledges
//! - [`users`] - register, login, logout, view and edit accounts
//! - [`images`] - petition and user images
//! - [`health`] - health check endpoint

pub mod health;
pub mod images;
pub mod petitions;
pub mod support_tiers;
pub mod supporters;
pub mod users;

pub use health::health_handler;
