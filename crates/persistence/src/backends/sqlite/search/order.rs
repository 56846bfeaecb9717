//! Sort resolver.

use crate::types::SortOrder;

/// Returns the column a sort order ranks by.
pub fn sort_column(order: SortOrder) -> &'static str {
    match order {
        SortOrder::AlphabeticalAsc | SortOrder::AlphabeticalDesc => "p.title",
        SortOrder::CostAsc | SortOrder::CostDesc => "sc.supporting_cost",
        SortOrder::CreatedAsc | SortOrder::CreatedDesc => "p.creation_date",
    }
}

fn direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::AlphabeticalAsc | SortOrder::CostAsc | SortOrder::CreatedAsc => "ASC",
        SortOrder::AlphabeticalDesc | SortOrder::CostDesc | SortOrder::CreatedDesc => "DESC",
    }
}

/// Builds the ORDER BY clause for `order`.
///
/// Always ends with `p.id ASC` so rows with equal sort values come back in
/// the same order on every query.
pub fn build_order_by(order: SortOrder) -> String {
    format!(
        "ORDER BY {} {}, p.id ASC",
        sort_column(order),
        direction(order)
    )
}
