//! Core storage traits and abstractions.
//!
//! - [`Backend`] - connection pool lifecycle and schema initialization
//! - [`CategoryStorage`], [`UserStorage`], [`PetitionStorage`],
//!   [`SupportTierStorage`], [`SupporterStorage`] - per-entity operations
//! - [`PetitionSearchProvider`] - petition search
//! - [`PlatformStorage`] - the union of the above
//!
//! # Trait Hierarchy
//!
//! ```text
//! PlatformStorage
//!     ├── Backend
//!     ├── CategoryStorage
//!     ├── UserStorage
//!     ├── PetitionStorage
//!     ├── SupportTierStorage
//!     ├── SupporterStorage
//!     └── PetitionSearchProvider
//! ```
//!
//! Code that needs only part of the surface should bound on the narrowest
//! trait; the search normalizer, for example, only needs [`CategoryStorage`].

pub mod backend;
pub mod search;
pub mod storage;

pub use backend::{Backend, BackendKind};
pub use search::{PetitionSearchProvider, PlatformStorage};
pub use storage::{
    CategoryStorage, PetitionStorage, SupportTierStorage, SupporterStorage, UserStorage,
};
