//! Petition detail assembly.
//!
//! A detail view merges three independent reads (tiers, owner, funding
//! totals) that run concurrently, alongside a re-read of the petition so a
//! concurrent delete surfaces as not-found. Any one failing fails the whole
//! view. A petition without tiers still has a detail view, with an empty
//! tier list.

use tracing::debug;

use crate::core::{PetitionStorage, SupportTierStorage, UserStorage};
use crate::error::{StorageError, StorageResult};
use crate::types::{Petition, PetitionDetail};

/// Loads a petition by id and assembles its detail view.
///
/// # Errors
///
/// * `ResourceError::NotFound` - the petition (or its owner) does not exist
pub async fn petition_detail<S>(storage: &S, petition_id: i64) -> StorageResult<PetitionDetail>
where
    S: PetitionStorage + SupportTierStorage + UserStorage + ?Sized,
{
    let petition = storage
        .read_petition(petition_id)
        .await?
        .ok_or_else(|| StorageError::not_found("petition", petition_id))?;
    assemble_detail(storage, &petition).await
}

/// Assembles the detail view of an already-loaded petition.
pub async fn assemble_detail<S>(storage: &S, petition: &Petition) -> StorageResult<PetitionDetail>
where
    S: PetitionStorage + SupportTierStorage + UserStorage + ?Sized,
{
    let (current, tiers, owner, funding) = tokio::try_join!(
        storage.read_petition(petition.id),
        storage.list_support_tiers(petition.id),
        storage.read_user(petition.owner_id),
        storage.funding_summary(petition.id),
    )?;

    if current.is_none() {
        debug!(petition_id = petition.id, "Petition vanished during assembly");
        return Err(StorageError::not_found("petition", petition.id));
    }
    let owner = owner.ok_or_else(|| StorageError::not_found("user", petition.owner_id))?;

    Ok(PetitionDetail {
        petition_id: petition.id,
        title: petition.title.clone(),
        description: petition.description.clone(),
        category_id: petition.category_id,
        owner_id: petition.owner_id,
        owner_first_name: owner.first_name,
        owner_last_name: owner.last_name,
        number_of_supporters: funding.supporter_count,
        money_raised: funding.money_raised,
        creation_date: petition.creation_date,
        support_tiers: tiers,
    })
}
