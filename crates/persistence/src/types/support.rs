//! Support tiers and pledges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A support tier as exposed publicly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTier {
    pub support_tier_id: i64,
    pub title: String,
    pub description: String,
    pub cost: i64,
}

/// A support tier together with its owning petition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSupportTier {
    pub id: i64,
    pub petition_id: i64,
    pub title: String,
    pub description: String,
    pub cost: i64,
}

impl From<StoredSupportTier> for SupportTier {
    fn from(tier: StoredSupportTier) -> Self {
        SupportTier {
            support_tier_id: tier.id,
            title: tier.title,
            description: tier.description,
            cost: tier.cost,
        }
    }
}

/// Input for a new support tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupportTier {
    pub title: String,
    pub description: String,
    pub cost: i64,
}

/// Replacement values for an existing tier. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTierUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cost: Option<i64>,
}

/// A pledge row from the `supporter` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pledge {
    pub id: i64,
    pub petition_id: i64,
    pub support_tier_id: i64,
    pub user_id: i64,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Input for a new pledge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPledge {
    pub support_tier_id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// A pledge joined with the supporting user's public name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupporterView {
    pub support_id: i64,
    pub support_tier_id: i64,
    pub message: Option<String>,
    pub supporter_id: i64,
    pub supporter_first_name: String,
    pub supporter_last_name: String,
    pub timestamp: DateTime<Utc>,
}
