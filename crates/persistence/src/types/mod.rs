//! Domain types for the persistence layer.
//!
//! - [`Petition`], [`Category`], [`PetitionSummary`], [`PetitionDetail`] - petition records
//! - [`SupportTier`], [`Pledge`], [`SupporterView`] - tiers and pledges
//! - [`User`] and its public projections
//! - [`RawSearchParams`], [`SearchFilters`], [`SortOrder`] - search input
//! - [`PageWindow`], [`PetitionPage`] - pagination
//!
//! # Examples
//!
//! ```
//! use petitio_persistence::types::{PageWindow, SearchFilters, SortOrder};
//!
//! let filters = SearchFilters::new()
//!     .with_text("park")
//!     .with_categories([1, 4])
//!     .with_sort(SortOrder::CostAsc)
//!     .with_window(PageWindow::new(0, 10));
//!
//! assert_eq!(filters.category_ids, vec![1, 4]);
//! ```

mod pagination;
mod petition;
mod search_params;
mod support;
mod user;

pub use pagination::{PageWindow, PetitionPage, paginate};
pub use petition::{
    Category, FundingSummary, NewPetition, Petition, PetitionDetail, PetitionSummary,
    PetitionUpdate,
};
pub use search_params::{OneOrMany, RawSearchParams, SearchFilters, SortOrder};
pub use support::{
    NewPledge, NewSupportTier, Pledge, StoredSupportTier, SupportTier, SupportTierUpdate,
    SupporterView,
};
pub use user::{NewUser, PrivateUser, PublicUser, User, UserUpdate};
