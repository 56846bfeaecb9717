//! Petition search.
//!
//! The read path for `GET /petitions`:
//!
//! ```text
//! RawSearchParams
//!     └── normalizer::normalize      (typed SearchFilters, categories checked)
//!             └── PetitionSearchProvider::find_petitions
//!                     (predicates + order + aggregates, one statement)
//!                     └── PetitionPage::from_matches   (window applied in memory)
//! ```
//!
//! The backend-specific statement construction lives with each backend; see
//! `backends::sqlite::search` for the SQLite compiler.

pub mod normalizer;

use tracing::debug;

use crate::core::{CategoryStorage, PetitionSearchProvider};
use crate::error::StorageResult;
use crate::types::{PetitionPage, RawSearchParams, SearchFilters};

pub use normalizer::{normalize, parse_filters};

/// Runs a search from raw request parameters.
///
/// # Errors
///
/// * `ValidationError` - a parameter is malformed or names an unknown category
/// * `BackendError` - the datastore failed; nothing is returned partially
pub async fn search_petitions<S>(storage: &S, raw: RawSearchParams) -> StorageResult<PetitionPage>
where
    S: CategoryStorage + PetitionSearchProvider + ?Sized,
{
    let filters = normalize(raw, storage).await?;
    search_with_filters(storage, &filters).await
}

/// Runs a search from already-validated filters.
pub async fn search_with_filters<S>(
    storage: &S,
    filters: &SearchFilters,
) -> StorageResult<PetitionPage>
where
    S: PetitionSearchProvider + ?Sized,
{
    let matches = storage.find_petitions(filters).await?;
    let page = PetitionPage::from_matches(matches, &filters.window);
    debug!(
        matched = page.count,
        returned = page.petitions.len(),
        sort = %filters.sort,
        "Petition search complete"
    );
    Ok(page)
}
