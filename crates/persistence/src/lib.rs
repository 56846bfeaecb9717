//! Petitio Persistence Layer
//!
//! Storage, search and detail assembly for the Petitio petition platform.
//!
//! # Architecture
//!
//! - [`types`] - domain records, search parameters and pagination
//! - [`error`] - error taxonomy for all operations
//! - [`core`] - storage traits
//! - [`search`] - petition search: normalize, query, paginate
//! - [`detail`] - petition detail assembly
//! - [`backends`] - backend implementations (SQLite)
//!
//! # Quick Start
//!
//! ```no_run
//! use petitio_persistence::backends::sqlite::SqliteBackend;
//! use petitio_persistence::search::search_petitions;
//! use petitio_persistence::types::RawSearchParams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let params = RawSearchParams::from_pairs([("q", "park"), ("sortBy", "COST_ASC")]);
//! let page = search_petitions(&backend, params).await?;
//! println!("{} of {} petitions", page.petitions.len(), page.count);
//! # Ok(())
//! # }
//! ```
//!
//! # Search
//!
//! A search compiles every optional filter into a fixed-shape WHERE clause,
//! joins the per-petition cheapest tier cost and pledge count, orders with an
//! id tie-break, and windows the full result in memory so the reported
//! `count` is always the total number of matches. Petitions without support
//! tiers never appear in search results.
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes

pub mod backends;
pub mod core;
pub mod detail;
pub mod error;
pub mod search;
pub mod types;

pub use error::{StorageError, StorageResult};
