//! Predicate compiler.
//!
//! Every optional filter becomes an [`OptionalPredicate`]: a fixed slot, an
//! explicit enabled flag, and the values its condition binds. Each compiles
//! to `(<flag> = 0 OR <condition>)` where the flag is bound to `1` when the
//! filter is present and `0` when it is absent, so the statement text depends
//! only on the number of category ids, never on which filters are active.

use crate::types::SearchFilters;

use super::query_builder::{SqlFragment, SqlParam};

/// The predicate slots, in the order they appear in the WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateSlot {
    /// Title or description contains the query text, ignoring case.
    Text,
    /// Petition is owned by the given user.
    Owner,
    /// The given user has pledged to the petition.
    Supporter,
    /// Cheapest tier costs at most the given amount.
    CostCeiling,
    /// Petition belongs to one of the given categories.
    Category,
}

impl PredicateSlot {
    /// Renders the condition for this slot against the given placeholders.
    fn condition(&self, values: &[String]) -> String {
        match self {
            PredicateSlot::Text => format!(
                "lower_unicode(p.title) LIKE {} ESCAPE '\\' OR lower_unicode(p.description) LIKE {} ESCAPE '\\'",
                values[0], values[1]
            ),
            PredicateSlot::Owner => format!("p.owner_id = {}", values[0]),
            PredicateSlot::Supporter => format!(
                "EXISTS (SELECT 1 FROM supporter sp WHERE sp.petition_id = p.id AND sp.user_id = {})",
                values[0]
            ),
            PredicateSlot::CostCeiling => format!("sc.supporting_cost <= {}", values[0]),
            PredicateSlot::Category => format!("p.category_id IN ({})", values.join(", ")),
        }
    }
}

/// One toggleable WHERE-clause predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalPredicate {
    pub slot: PredicateSlot,
    pub enabled: bool,
    /// Values bound after the flag. Never empty.
    pub values: Vec<SqlParam>,
}

impl OptionalPredicate {
    /// Case-insensitive substring match on title or description.
    ///
    /// Both columns bind the same pattern under one flag.
    pub fn text(query: Option<&str>) -> Self {
        let values = match query {
            Some(text) => {
                let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
                vec![SqlParam::string(pattern.clone()), SqlParam::string(pattern)]
            }
            None => vec![SqlParam::Null, SqlParam::Null],
        };
        Self {
            slot: PredicateSlot::Text,
            enabled: query.is_some(),
            values,
        }
    }

    pub fn owner(owner_id: Option<i64>) -> Self {
        Self::single(PredicateSlot::Owner, owner_id)
    }

    pub fn supporter(user_id: Option<i64>) -> Self {
        Self::single(PredicateSlot::Supporter, user_id)
    }

    pub fn cost_ceiling(max_cost: Option<i64>) -> Self {
        Self::single(PredicateSlot::CostCeiling, max_cost)
    }

    /// Category membership with one placeholder per id.
    ///
    /// An empty list disables the predicate and binds a single NULL, which
    /// no category id ever equals.
    pub fn category(category_ids: &[i64]) -> Self {
        let values = if category_ids.is_empty() {
            vec![SqlParam::Null]
        } else {
            category_ids.iter().copied().map(SqlParam::integer).collect()
        };
        Self {
            slot: PredicateSlot::Category,
            enabled: !category_ids.is_empty(),
            values,
        }
    }

    fn single(slot: PredicateSlot, value: Option<i64>) -> Self {
        Self {
            slot,
            enabled: value.is_some(),
            values: vec![value.map_or(SqlParam::Null, SqlParam::integer)],
        }
    }

    /// Appends this predicate's parameters to `fragment` and returns its SQL.
    fn compile_into(&self, fragment: &mut SqlFragment) -> String {
        let flag = fragment.add_param(SqlParam::integer(i64::from(self.enabled)));
        let placeholders: Vec<String> = self
            .values
            .iter()
            .cloned()
            .map(|value| fragment.add_param(value))
            .collect();
        format!("({} = 0 OR ({}))", flag, self.slot.condition(&placeholders))
    }
}

/// Builds the predicate list for `filters` in slot order.
pub fn predicates_for(filters: &SearchFilters) -> Vec<OptionalPredicate> {
    vec![
        OptionalPredicate::text(filters.text.as_deref()),
        OptionalPredicate::owner(filters.owner_id),
        OptionalPredicate::supporter(filters.supporter_id),
        OptionalPredicate::cost_ceiling(filters.max_supporting_cost),
        OptionalPredicate::category(&filters.category_ids),
    ]
}

/// Compiles predicates into one ANDed fragment.
///
/// Placeholders are numbered from `?1` in the order parameters are bound,
/// so `fragment.params[i]` always binds `?{i + 1}`.
pub fn compile(predicates: &[OptionalPredicate]) -> SqlFragment {
    let mut fragment = SqlFragment::new("");
    let clauses: Vec<String> = predicates
        .iter()
        .map(|predicate| predicate.compile_into(&mut fragment))
        .collect();
    fragment.sql = clauses.join(" AND ");
    fragment
}

/// Escapes LIKE wildcards so `text` matches literally under `ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
