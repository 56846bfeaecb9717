//! Petition and category records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::support::{NewSupportTier, SupportTier};

/// A petition as stored in the `petition` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Petition {
    /// Petition identity.
    pub id: i64,
    /// Title, unique across all petitions.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// When the petition was created.
    pub creation_date: DateTime<Utc>,
    /// The owning user.
    pub owner_id: i64,
    /// The petition's category.
    pub category_id: i64,
    /// Filename of the hero image, if one was uploaded.
    pub image_filename: Option<String>,
}

/// A petition category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identity.
    pub category_id: i64,
    /// Display name.
    pub name: String,
}

/// Input for creating a petition together with its initial tiers.
#[derive(Debug, Clone)]
pub struct NewPetition {
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub owner_id: i64,
    pub category_id: i64,
    pub support_tiers: Vec<NewSupportTier>,
}

/// Replacement values for an existing petition.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetitionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

impl PetitionUpdate {
    /// Returns true if no field is being changed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category_id.is_none()
    }
}

/// One row of a petition search.
///
/// Carries the two derived aggregates computed at query time: the cheapest
/// tier cost and the number of pledges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetitionSummary {
    pub petition_id: i64,
    pub title: String,
    pub category_id: i64,
    pub owner_id: i64,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub creation_date: DateTime<Utc>,
    pub number_of_supporters: i64,
    pub supporting_cost: i64,
}

/// Aggregate pledge numbers for one petition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSummary {
    /// Number of supporter rows.
    pub supporter_count: i64,
    /// Sum of the pledged tiers' costs.
    pub money_raised: i64,
}

/// The public representation of a single petition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetitionDetail {
    pub petition_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub owner_id: i64,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub number_of_supporters: i64,
    pub money_raised: i64,
    pub creation_date: DateTime<Utc>,
    pub support_tiers: Vec<SupportTier>,
}
