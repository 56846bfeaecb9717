//! Test fixtures for persistence layer testing.
//!
//! Builders for users, petitions and pledges with predictable ids and
//! creation dates.

use chrono::{DateTime, Duration, TimeZone, Utc};

use petitio_persistence::backends::sqlite::SqliteBackend;
use petitio_persistence::core::{PetitionStorage, SupportTierStorage, SupporterStorage, UserStorage};
use petitio_persistence::types::{NewPetition, NewPledge, NewSupportTier, NewUser};

/// Creates an in-memory backend with the schema initialized.
pub fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

/// Midnight UTC on 1 January 2024 plus `days`.
pub fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
}

/// A petition fixture for testing.
#[derive(Debug, Clone)]
pub struct PetitionFixture {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub created: DateTime<Utc>,
    /// Tier costs; one tier is created per entry.
    pub tier_costs: Vec<i64>,
}

impl PetitionFixture {
    /// A petition in category 1 with a single tier costing 10.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: "A petition used in tests".to_string(),
            category_id: 1,
            created: day(0),
            tier_costs: vec![10],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn created_on(mut self, days: i64) -> Self {
        self.created = day(days);
        self
    }

    pub fn with_tiers(mut self, costs: &[i64]) -> Self {
        self.tier_costs = costs.to_vec();
        self
    }

    fn into_new_petition(self, owner_id: i64) -> NewPetition {
        NewPetition {
            title: self.title,
            description: self.description,
            creation_date: self.created,
            owner_id,
            category_id: self.category_id,
            support_tiers: self
                .tier_costs
                .iter()
                .enumerate()
                .map(|(i, cost)| NewSupportTier {
                    title: format!("Tier {}", i + 1),
                    description: format!("Tier costing {}", cost),
                    cost: *cost,
                })
                .collect(),
        }
    }
}

/// Registers a user with the given email and returns its id.
pub async fn add_user(backend: &SqliteBackend, first_name: &str, email: &str) -> i64 {
    backend
        .create_user(NewUser {
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            email: email.to_string(),
            password: "not-a-real-hash".to_string(),
        })
        .await
        .expect("Failed to create user")
}

/// Creates a petition and returns its id.
pub async fn add_petition(backend: &SqliteBackend, owner_id: i64, fixture: PetitionFixture) -> i64 {
    backend
        .create_petition(fixture.into_new_petition(owner_id))
        .await
        .expect("Failed to create petition")
}

/// Returns the id of the petition's tier at `index` (creation order).
pub async fn tier_id(backend: &SqliteBackend, petition_id: i64, index: usize) -> i64 {
    backend
        .list_support_tiers(petition_id)
        .await
        .expect("Failed to list tiers")[index]
        .support_tier_id
}

/// Pledges `user_id` to the petition's tier at `index`.
pub async fn pledge(backend: &SqliteBackend, petition_id: i64, index: usize, user_id: i64) -> i64 {
    let support_tier_id = tier_id(backend, petition_id, index).await;
    backend
        .add_pledge(
            petition_id,
            user_id,
            NewPledge {
                support_tier_id,
                message: None,
            },
            Utc::now(),
        )
        .await
        .expect("Failed to add pledge")
}
