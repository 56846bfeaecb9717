//! Filter normalization.
//!
//! Turns string-valued [`RawSearchParams`] into typed [`SearchFilters`].
//! Parsing is pure; the category existence check needs a
//! [`CategoryStorage`] and runs only once parsing has succeeded.

use std::str::FromStr;

use tracing::debug;

use crate::core::CategoryStorage;
use crate::error::{StorageResult, ValidationError};
use crate::types::{OneOrMany, PageWindow, RawSearchParams, SearchFilters, SortOrder};

/// Parses and validates raw parameters, including category existence.
pub async fn normalize<C>(raw: RawSearchParams, categories: &C) -> StorageResult<SearchFilters>
where
    C: CategoryStorage + ?Sized,
{
    let filters = parse_filters(raw)?;
    for &category_id in &filters.category_ids {
        if !categories.category_exists(category_id).await? {
            debug!(category_id, "Search references unknown category");
            return Err(ValidationError::UnknownCategory { category_id }.into());
        }
    }
    Ok(filters)
}

/// Parses raw parameters without touching storage.
///
/// Empty strings count as absent. Numeric values are trimmed before
/// parsing; the text query is kept verbatim, surrounding whitespace included.
/// Category ids are deduplicated, keeping the first occurrence.
pub fn parse_filters(raw: RawSearchParams) -> Result<SearchFilters, ValidationError> {
    let category_ids = raw
        .category_ids
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .iter()
        .map(|value| parse_id("categoryIds", value))
        .collect::<Result<Vec<_>, _>>()?;

    let window = PageWindow {
        start_index: optional(raw.start_index.as_deref())
            .map(|value| parse_int("startIndex", value))
            .transpose()?,
        count: optional(raw.count.as_deref())
            .map(|value| parse_int("count", value))
            .transpose()?,
    };

    let filters = SearchFilters {
        text: raw.q.filter(|q| !q.is_empty()),
        owner_id: optional_id("ownerId", raw.owner_id.as_deref())?,
        supporter_id: optional_id("supporterId", raw.supporter_id.as_deref())?,
        max_supporting_cost: optional_id("supportingCost", raw.supporting_cost.as_deref())?,
        category_ids: Vec::new(),
        sort: optional(raw.sort_by.as_deref())
            .map(SortOrder::parse)
            .unwrap_or_default(),
        window,
    }
    .with_categories(category_ids);

    Ok(filters)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn optional_id(parameter: &str, value: Option<&str>) -> Result<Option<i64>, ValidationError> {
    optional(value).map(|value| parse_id(parameter, value)).transpose()
}

fn parse_id(parameter: &str, value: &str) -> Result<i64, ValidationError> {
    let parsed = parse_int(parameter, value)?;
    if parsed < 0 {
        return Err(invalid(parameter, value, "expected a non-negative integer"));
    }
    Ok(parsed)
}

fn parse_int(parameter: &str, value: &str) -> Result<i64, ValidationError> {
    i64::from_str(value.trim()).map_err(|_| invalid(parameter, value, "expected an integer"))
}

fn invalid(parameter: &str, value: &str, expected: &str) -> ValidationError {
    ValidationError::InvalidSearchParameter {
        parameter: parameter.to_string(),
        message: format!("{expected}, got '{value}'"),
    }
}
