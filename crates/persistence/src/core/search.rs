//! Search provider traits.
//!
//! - [`PetitionSearchProvider`] - executes a petition search
//! - [`PlatformStorage`] - everything the service needs from one backend

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{PetitionSummary, SearchFilters};

use super::backend::Backend;
use super::storage::{
    CategoryStorage, PetitionStorage, SupportTierStorage, SupporterStorage, UserStorage,
};

/// Petition search.
///
/// Implementations compile `filters` into a single parameterized statement
/// and return every matching petition in the requested order. The result is
/// never windowed here; pagination happens after the full match count is
/// known.
#[async_trait]
pub trait PetitionSearchProvider: Send + Sync {
    /// Returns all petitions matching `filters`, ordered by `filters.sort`
    /// with an ascending-id tie-break.
    ///
    /// Petitions without any support tier never match.
    async fn find_petitions(&self, filters: &SearchFilters)
    -> StorageResult<Vec<PetitionSummary>>;
}

/// The complete storage surface of the platform.
///
/// Implemented automatically for any backend that implements every entity
/// trait and [`PetitionSearchProvider`].
pub trait PlatformStorage:
    Backend
    + CategoryStorage
    + UserStorage
    + PetitionStorage
    + SupportTierStorage
    + SupporterStorage
    + PetitionSearchProvider
    + 'static
{
}

impl<T> PlatformStorage for T where
    T: Backend
        + CategoryStorage
        + UserStorage
        + PetitionStorage
        + SupportTierStorage
        + SupporterStorage
        + PetitionSearchProvider
        + 'static
{
}
