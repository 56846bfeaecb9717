//! Entity storage traits.
//!
//! One trait per table. Lookups return `Option` and leave the decision of
//! whether absence is an error to the caller; mutations on a missing row
//! return [`StorageError::Resource`](crate::error::StorageError::Resource)
//! with `NotFound`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageResult;
use crate::types::{
    Category, FundingSummary, NewPetition, NewPledge, NewSupportTier, NewUser, Petition,
    PetitionUpdate, Pledge, StoredSupportTier, SupportTier, SupportTierUpdate, SupporterView,
    User, UserUpdate,
};

/// The category lookup table.
#[async_trait]
pub trait CategoryStorage: Send + Sync {
    /// Returns true if a category with this id exists.
    async fn category_exists(&self, category_id: i64) -> StorageResult<bool>;

    /// Lists every category ordered by id.
    async fn list_categories(&self) -> StorageResult<Vec<Category>>;
}

/// User accounts and sessions.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Registers a user and returns the new id.
    ///
    /// # Errors
    ///
    /// * `ResourceError::AlreadyExists` - if the email is already registered
    async fn create_user(&self, user: NewUser) -> StorageResult<i64>;

    async fn read_user(&self, user_id: i64) -> StorageResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    async fn find_user_by_token(&self, token: &str) -> StorageResult<Option<User>>;

    /// Returns true if another user (not `excluding`) has this email.
    async fn email_in_use(&self, email: &str, excluding: Option<i64>) -> StorageResult<bool>;

    async fn update_user(&self, user_id: i64, update: UserUpdate) -> StorageResult<()>;

    /// Sets or clears the session token.
    async fn set_auth_token(&self, user_id: i64, token: Option<&str>) -> StorageResult<()>;

    /// Sets or clears the profile image filename.
    async fn set_user_image(&self, user_id: i64, filename: Option<&str>) -> StorageResult<()>;
}

/// Petitions.
#[async_trait]
pub trait PetitionStorage: Send + Sync {
    /// Creates a petition and its initial tiers atomically, returning the id.
    ///
    /// # Errors
    ///
    /// * `ResourceError::AlreadyExists` - if the title or a tier title is taken
    async fn create_petition(&self, petition: NewPetition) -> StorageResult<i64>;

    async fn read_petition(&self, petition_id: i64) -> StorageResult<Option<Petition>>;

    /// Returns true if a petition other than `excluding` has this title.
    async fn petition_title_taken(
        &self,
        title: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool>;

    async fn update_petition(&self, petition_id: i64, update: PetitionUpdate)
    -> StorageResult<()>;

    /// Deletes a petition together with its tiers.
    async fn delete_petition(&self, petition_id: i64) -> StorageResult<()>;

    async fn set_petition_image(
        &self,
        petition_id: i64,
        filename: Option<&str>,
    ) -> StorageResult<()>;

    /// Pledge count and money raised. Both are zero for a petition without
    /// supporters, and for an id that does not exist.
    async fn funding_summary(&self, petition_id: i64) -> StorageResult<FundingSummary>;
}

/// Support tiers.
#[async_trait]
pub trait SupportTierStorage: Send + Sync {
    async fn create_support_tier(
        &self,
        petition_id: i64,
        tier: NewSupportTier,
    ) -> StorageResult<i64>;

    async fn read_support_tier(&self, tier_id: i64) -> StorageResult<Option<StoredSupportTier>>;

    /// Tiers of one petition ordered by id.
    async fn list_support_tiers(&self, petition_id: i64) -> StorageResult<Vec<SupportTier>>;

    async fn count_support_tiers(&self, petition_id: i64) -> StorageResult<i64>;

    /// Returns true if another tier of the petition has this title.
    async fn tier_title_taken(
        &self,
        petition_id: i64,
        title: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool>;

    async fn update_support_tier(
        &self,
        tier_id: i64,
        update: SupportTierUpdate,
    ) -> StorageResult<()>;

    async fn delete_support_tier(&self, tier_id: i64) -> StorageResult<()>;

    async fn tier_has_supporters(&self, tier_id: i64) -> StorageResult<bool>;
}

/// Pledges.
#[async_trait]
pub trait SupporterStorage: Send + Sync {
    /// Records a pledge and returns its id.
    async fn add_pledge(
        &self,
        petition_id: i64,
        user_id: i64,
        pledge: NewPledge,
        timestamp: DateTime<Utc>,
    ) -> StorageResult<i64>;

    async fn find_pledge(
        &self,
        petition_id: i64,
        tier_id: i64,
        user_id: i64,
    ) -> StorageResult<Option<Pledge>>;

    /// Pledges for a petition, newest first, joined with supporter names.
    async fn list_supporters(&self, petition_id: i64) -> StorageResult<Vec<SupporterView>>;
}
