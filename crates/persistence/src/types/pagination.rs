//! Pagination types for search results.
//!
//! Search executes unsliced and the window is applied in memory, so the
//! reported `count` is always the size of the full match set.

use serde::{Deserialize, Serialize};

use super::petition::PetitionSummary;

/// A requested `[start_index, start_index + count)` window.
///
/// Both bounds are kept signed: negative values are accepted at the API
/// boundary and simply produce an empty page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// First element to return. Defaults to 0.
    pub start_index: Option<i64>,

    /// Maximum number of elements. `None` means "to the end".
    pub count: Option<i64>,
}

impl PageWindow {
    /// A window covering the whole result set.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a window from explicit bounds.
    pub fn new(start_index: i64, count: i64) -> Self {
        Self {
            start_index: Some(start_index),
            count: Some(count),
        }
    }

    /// Resolves the window against a list of `len` elements.
    ///
    /// Returns `None` when the window selects nothing.
    pub fn bounds(&self, len: usize) -> Option<(usize, usize)> {
        let start = self.start_index.unwrap_or(0);
        if start < 0 {
            return None;
        }
        let start = usize::try_from(start).ok()?;
        if start >= len {
            return None;
        }

        let end = match self.count {
            None => len,
            Some(count) if count < 0 => return None,
            Some(count) => {
                let count = usize::try_from(count).unwrap_or(usize::MAX);
                start.saturating_add(count).min(len)
            }
        };

        (end > start).then_some((start, end))
    }
}

/// A page of search results plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetitionPage {
    /// The petitions inside the requested window.
    pub petitions: Vec<PetitionSummary>,

    /// Number of petitions that matched before the window was applied.
    pub count: usize,
}

/// Applies `window` to the full, ordered match list.
pub fn paginate<T>(matches: Vec<T>, window: &PageWindow) -> (Vec<T>, usize) {
    let total = matches.len();
    let page = match window.bounds(total) {
        Some((start, end)) => matches.into_iter().skip(start).take(end - start).collect(),
        None => Vec::new(),
    };
    (page, total)
}

impl PetitionPage {
    /// Builds a page by windowing the full match list.
    pub fn from_matches(matches: Vec<PetitionSummary>, window: &PageWindow) -> Self {
        let (petitions, count) = paginate(matches, window);
        Self { petitions, count }
    }
}
