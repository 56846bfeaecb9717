//! SQL query builder for petition search.
//!
//! Assembles the derived aggregates, the base petition/owner join, the
//! compiled predicates and the ORDER BY clause into one statement.

use crate::types::SearchFilters;

use super::order::build_order_by;
use super::predicates::{compile, predicates_for};

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Adds a parameter placeholder and returns the placeholder string.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns true if this fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Cheapest tier per petition. A petition with no tiers has no row here.
const SUPPORTING_COSTS_CTE: &str = "supporting_costs AS (\
SELECT petition_id, MIN(cost) AS supporting_cost \
FROM support_tier GROUP BY petition_id)";

/// Pledge count per petition.
const SUPPORTER_COUNTS_CTE: &str = "supporter_counts AS (\
SELECT petition_id, COUNT(id) AS number_of_supporters \
FROM supporter GROUP BY petition_id)";

/// Column order is relied on by the row decoder.
const SELECT_COLUMNS: &str = "p.id, p.title, p.category_id, p.owner_id, \
u.first_name, u.last_name, p.creation_date, \
COALESCE(s.number_of_supporters, 0) AS number_of_supporters, sc.supporting_cost";

/// The supporting-cost join is INNER, which hides tier-less petitions. The
/// supporter-count join is LEFT so petitions nobody has pledged to still
/// match, with a count of zero.
const FROM_CLAUSE: &str = "FROM petition p \
INNER JOIN user u ON p.owner_id = u.id \
INNER JOIN supporting_costs sc ON p.id = sc.petition_id \
LEFT JOIN supporter_counts s ON p.id = s.petition_id";

/// Builds the petition search statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the complete, unpaginated search statement for `filters`.
    pub fn build(&self, filters: &SearchFilters) -> SqlFragment {
        let predicates = compile(&predicates_for(filters));
        let sql = format!(
            "WITH {}, {} SELECT {} {} WHERE {} {}",
            SUPPORTING_COSTS_CTE,
            SUPPORTER_COUNTS_CTE,
            SELECT_COLUMNS,
            FROM_CLAUSE,
            predicates.sql,
            build_order_by(filters.sort),
        );
        SqlFragment::with_params(sql, predicates.params)
    }
}
