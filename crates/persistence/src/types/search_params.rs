//! Search parameter types.
//!
//! [`RawSearchParams`] is what arrives from the outside world: every field is
//! an optional string. The filter normalizer turns it into a typed
//! [`SearchFilters`], which is the only input the query builder accepts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pagination::PageWindow;

/// A value that may be supplied once or as a list.
///
/// Query strings and JSON bodies both produce either shape for
/// `categoryIds`; callers always read it back as a `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single scalar value.
    One(T),
    /// A list of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flattens into a list, wrapping a scalar as a one-element list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    /// Appends a value, promoting a scalar to a list.
    pub fn push(self, value: T) -> Self {
        let mut values = self.into_vec();
        values.push(value);
        OneOrMany::Many(values)
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// Unvalidated search parameters, keyed by their public names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchParams {
    /// Free-text query matched against title and description.
    pub q: Option<String>,
    pub owner_id: Option<String>,
    pub supporter_id: Option<String>,
    /// Ceiling on the petition's cheapest tier.
    pub supporting_cost: Option<String>,
    #[serde(default)]
    pub category_ids: Option<OneOrMany<String>>,
    pub sort_by: Option<String>,
    pub start_index: Option<String>,
    pub count: Option<String>,
}

impl RawSearchParams {
    /// Builds parameters from decoded query-string pairs.
    ///
    /// Repeated `categoryIds` keys accumulate; for every other key the last
    /// occurrence wins. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = RawSearchParams::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "q" => params.q = Some(value),
                "ownerId" => params.owner_id = Some(value),
                "supporterId" => params.supporter_id = Some(value),
                "supportingCost" => params.supporting_cost = Some(value),
                "categoryIds" => {
                    params.category_ids = Some(match params.category_ids.take() {
                        Some(existing) => existing.push(value),
                        None => OneOrMany::One(value),
                    });
                }
                "sortBy" => params.sort_by = Some(value),
                "startIndex" => params.start_index = Some(value),
                "count" => params.count = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Result ordering for a petition search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    AlphabeticalAsc,
    AlphabeticalDesc,
    CostAsc,
    CostDesc,
    /// Oldest first; used when no or an unknown key is given.
    #[default]
    CreatedAsc,
    CreatedDesc,
}

impl SortOrder {
    /// Parses a symbolic sort key. Unknown keys fall back to the default.
    pub fn parse(key: &str) -> Self {
        match key {
            "ALPHABETICAL_ASC" => SortOrder::AlphabeticalAsc,
            "ALPHABETICAL_DESC" => SortOrder::AlphabeticalDesc,
            "COST_ASC" => SortOrder::CostAsc,
            "COST_DESC" => SortOrder::CostDesc,
            "CREATED_ASC" => SortOrder::CreatedAsc,
            "CREATED_DESC" => SortOrder::CreatedDesc,
            _ => SortOrder::default(),
        }
    }

    /// Returns the symbolic key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::AlphabeticalAsc => "ALPHABETICAL_ASC",
            SortOrder::AlphabeticalDesc => "ALPHABETICAL_DESC",
            SortOrder::CostAsc => "COST_ASC",
            SortOrder::CostDesc => "COST_DESC",
            SortOrder::CreatedAsc => "CREATED_ASC",
            SortOrder::CreatedDesc => "CREATED_DESC",
        }
    }

    /// All keys, in declaration order.
    pub fn all() -> [SortOrder; 6] {
        [
            SortOrder::AlphabeticalAsc,
            SortOrder::AlphabeticalDesc,
            SortOrder::CostAsc,
            SortOrder::CostDesc,
            SortOrder::CreatedAsc,
            SortOrder::CreatedDesc,
        ]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, typed search filters.
///
/// Every `None` (or an empty `category_ids`) means "do not filter on this".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub text: Option<String>,
    pub owner_id: Option<i64>,
    pub supporter_id: Option<i64>,
    pub max_supporting_cost: Option<i64>,
    /// Distinct category ids, in first-seen order.
    pub category_ids: Vec<i64>,
    pub sort: SortOrder,
    pub window: PageWindow,
}

impl SearchFilters {
    /// Filters that match every searchable petition.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_supporter(mut self, supporter_id: i64) -> Self {
        self.supporter_id = Some(supporter_id);
        self
    }

    pub fn with_max_supporting_cost(mut self, cost: i64) -> Self {
        self.max_supporting_cost = Some(cost);
        self
    }

    pub fn with_categories(mut self, category_ids: impl IntoIterator<Item = i64>) -> Self {
        for id in category_ids {
            if !self.category_ids.contains(&id) {
                self.category_ids.push(id);
            }
        }
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_window(mut self, window: PageWindow) -> Self {
        self.window = window;
        self
    }
}
