//! Ability service
//!
//! Catalog queries plus the ownership-checked mutations on abilities.

use std::sync::Arc;

use crate::app::requests::{validate_ability_name, AbilityQuery};
use crate::domain::entities::{
    Ability, AbilityId, AbilityOrphanPolicy, KittenId, NewAbility, UserId,
};
use crate::domain::ports::{AbilityRepository, KittenReadRepository};
use crate::error::{AppError, DomainError};

/// Service for the ability catalog
pub struct AbilityService<AR, KR>
where
    AR: AbilityRepository,
    KR: KittenReadRepository,
{
    abilities: Arc<AR>,
    kittens: Arc<KR>,
    orphan_policy: AbilityOrphanPolicy,
}

impl<AR, KR> AbilityService<AR, KR>
where
    AR: AbilityRepository,
    KR: KittenReadRepository,
{
    pub fn new(abilities: Arc<AR>, kittens: Arc<KR>, orphan_policy: AbilityOrphanPolicy) -> Self {
        Self {
            abilities,
            kittens,
            orphan_policy,
        }
    }

    /// List abilities, optionally only those bound to one kitten.
    /// An unknown kitten yields an empty list, not an error.
    pub async fn find_all(&self, query: AbilityQuery) -> Result<Vec<Ability>, AppError> {
        let abilities = match query.kitten_id {
            Some(kitten_id) => self.abilities.find_by_kitten_id(&kitten_id).await?,
            None => self.abilities.find_all().await?,
        };
        Ok(abilities)
    }

    pub async fn find_by_id(&self, id: &AbilityId) -> Result<Ability, AppError> {
        self.abilities
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::AbilityNotFound(*id).into())
    }

    /// Create an ability, bound to `new.kitten_id` when given
    pub async fn create(&self, user_id: &UserId, new: NewAbility) -> Result<Ability, AppError> {
        let name = validate_ability_name(&new.name)?;
        if let Some(kitten_id) = new.kitten_id {
            self.ensure_owned_kitten(&kitten_id, user_id).await?;
        }

        let ability = self
            .abilities
            .save(&NewAbility { name, ..new }.into_ability())
            .await?;

        tracing::info!(
            ability_id = %ability.id,
            kitten_id = ?ability.kitten_id,
            user_id = %user_id,
            "Ability created"
        );
        Ok(ability)
    }

    /// Bind a global ability to one of the user's kittens. The bound check
    /// and the write happen in one repository call.
    pub async fn assign(
        &self,
        user_id: &UserId,
        ability_id: &AbilityId,
        kitten_id: &KittenId,
    ) -> Result<Ability, AppError> {
        self.find_by_id(ability_id).await?;
        self.ensure_owned_kitten(kitten_id, user_id).await?;

        let saved = self.abilities.bind(ability_id, kitten_id).await?;

        tracing::info!(
            ability_id = %saved.id,
            kitten_id = %kitten_id,
            "Ability assigned"
        );
        Ok(saved)
    }

    /// Delete an ability. Bound abilities may only be deleted by the
    /// owner of their kitten.
    pub async fn delete(&self, user_id: &UserId, ability_id: &AbilityId) -> Result<(), AppError> {
        let ability = self.find_by_id(ability_id).await?;

        if let Some(kitten_id) = ability.kitten_id {
            if !self
                .kittens
                .is_kitten_owned_by_user(&kitten_id, user_id)
                .await?
            {
                tracing::warn!(
                    ability_id = %ability_id,
                    user_id = %user_id,
                    "Rejected ability deletion by non-owner"
                );
                return Err(DomainError::Unauthorized(format!(
                    "User {} does not own the kitten holding ability {}",
                    user_id, ability_id
                ))
                .into());
            }
        }

        if !self.abilities.delete(ability_id).await? {
            return Err(DomainError::AbilityNotFound(*ability_id).into());
        }
        tracing::info!(ability_id = %ability_id, "Ability deleted");
        Ok(())
    }

    /// Apply the orphan policy to every ability bound to a removed kitten.
    /// Returns how many abilities were affected.
    pub async fn release_kitten_abilities(&self, kitten_id: &KittenId) -> Result<usize, AppError> {
        let bound = self.abilities.find_by_kitten_id(kitten_id).await?;

        for ability in &bound {
            match self.orphan_policy {
                AbilityOrphanPolicy::Cascade => {
                    self.abilities.delete(&ability.id).await?;
                }
                AbilityOrphanPolicy::Orphan => {
                    let mut released = ability.clone();
                    released.kitten_id = None;
                    self.abilities.save(&released).await?;
                }
            }
        }

        tracing::info!(
            kitten_id = %kitten_id,
            policy = %self.orphan_policy,
            count = bound.len(),
            "Released kitten abilities"
        );
        Ok(bound.len())
    }

    async fn ensure_owned_kitten(
        &self,
        kitten_id: &KittenId,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        if self.kittens.find_by_id(kitten_id).await?.is_none() {
            return Err(DomainError::KittenNotFound(*kitten_id).into());
        }
        if !self
            .kittens
            .is_kitten_owned_by_user(kitten_id, user_id)
            .await?
        {
            tracing::warn!(
                kitten_id = %kitten_id,
                user_id = %user_id,
                "Rejected ability change on foreign kitten"
            );
            return Err(DomainError::Unauthorized(format!(
                "User {} does not own kitten {}",
                user_id, kitten_id
            ))
            .into());
        }
        Ok(())
    }
}
