//! SQLite backend implementation.
//!
//! Implements every storage trait plus petition search on top of a pooled
//! SQLite database. In-memory databases are meant for tests; file databases
//! run in WAL mode.
//!
//! # Example
//!
//! ```no_run
//! use petitio_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("./data/petitio.db")?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! category(id, name)
//! user(id, email, first_name, last_name, image_filename, password, auth_token)
//! petition(id, title, description, creation_date, image_filename, owner_id, category_id)
//! support_tier(id, petition_id, title, description, cost)
//! supporter(id, petition_id, support_tier_id, user_id, message, timestamp)
//! ```

mod backend;
mod schema;
pub mod search;
mod search_impl;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::{DEFAULT_CATEGORIES, SCHEMA_VERSION};
