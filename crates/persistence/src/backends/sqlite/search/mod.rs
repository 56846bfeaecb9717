//! SQLite search implementation.
//!
//! - [`predicates`] - optional predicates compiled to a parameterized WHERE fragment
//! - [`order`] - sort keys resolved to ORDER BY with an id tie-break
//! - [`query_builder`] - aggregates, joins, predicates and order in one statement

pub mod order;
pub mod predicates;
pub mod query_builder;

pub use order::build_order_by;
pub use predicates::{OptionalPredicate, PredicateSlot, compile, escape_like, predicates_for};
pub use query_builder::{QueryBuilder, SqlFragment, SqlParam};
