//! Battle service
//!
//! Creates battles, answers battle queries and resolves pending battles.
//!
//! Resolution runs load -> authorize -> decide -> persist. The persist step
//! is a single `commit_resolution` call: the Resolved battle, the win/loss
//! record and both experience rewards are written together under the
//! battle's optimistic version, so a battle is either untouched or fully
//! resolved and can never award experience twice.

use std::sync::Arc;

use crate::app::requests::BattleQuery;
use crate::domain::entities::{Battle, BattleId, BattleOutcome, Kitten, KittenId, UserId};
use crate::domain::ports::{BattleRepository, KittenRepository};
use crate::domain::rules::{BattleResolver, ProgressionEngine};
use crate::error::{AppError, DomainError};

/// Service for battles between kittens
pub struct BattleService<BR, KR>
where
    BR: BattleRepository,
    KR: KittenRepository,
{
    battles: Arc<BR>,
    kittens: Arc<KR>,
    resolver: BattleResolver,
    progression: ProgressionEngine,
}

impl<BR, KR> BattleService<BR, KR>
where
    BR: BattleRepository,
    KR: KittenRepository,
{
    pub fn new(
        battles: Arc<BR>,
        kittens: Arc<KR>,
        resolver: BattleResolver,
        progression: ProgressionEngine,
    ) -> Self {
        Self {
            battles,
            kittens,
            resolver,
            progression,
        }
    }

    /// All battles, or only those created by `query.user_id`
    pub async fn find_all(&self, query: BattleQuery) -> Result<Vec<Battle>, AppError> {
        let battles = match query.user_id {
            Some(user_id) => self.battles.find_by_user_id(&user_id).await?,
            None => self.battles.find_all().await?,
        };
        Ok(battles)
    }

    pub async fn find_by_id(&self, id: &BattleId) -> Result<Battle, AppError> {
        self.battles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::BattleNotFound(*id).into())
    }

    /// Challenge `participant_b_id` with one of the user's kittens
    pub async fn create(
        &self,
        user_id: &UserId,
        participant_a_id: &KittenId,
        participant_b_id: &KittenId,
    ) -> Result<Battle, AppError> {
        let battle = Battle::new(*user_id, *participant_a_id, *participant_b_id)?;
        self.load_kitten(participant_a_id).await?;
        self.load_kitten(participant_b_id).await?;

        if !self.kittens.is_owner(participant_a_id, user_id).await? {
            tracing::warn!(
                kitten_id = %participant_a_id,
                user_id = %user_id,
                "Rejected battle challenge with foreign kitten"
            );
            return Err(DomainError::Unauthorized(format!(
                "User {} does not own kitten {}",
                user_id, participant_a_id
            ))
            .into());
        }

        let created = self.battles.create(&battle).await?;
        tracing::info!(
            battle_id = %created.id,
            participant_a = %created.participant_a_id,
            participant_b = %created.participant_b_id,
            user_id = %user_id,
            "Battle created"
        );
        Ok(created)
    }

    /// Resolve a pending battle on behalf of `user_id`.
    ///
    /// Errors are reported in this order: `BattleNotFound`, `Unauthorized`,
    /// `InvalidState` (already resolved), `KittenNotFound`.
    pub async fn resolve(
        &self,
        battle_id: &BattleId,
        user_id: &UserId,
    ) -> Result<BattleOutcome, AppError> {
        let mut battle = self.find_by_id(battle_id).await?;
        self.authorize(&battle, user_id).await?;

        if battle.is_resolved() {
            tracing::warn!(battle_id = %battle_id, "Battle already resolved");
            return Err(already_resolved(battle_id).into());
        }

        let (a_id, b_id) = battle.participants();
        let a = self.load_kitten(&a_id).await?;
        let b = self.load_kitten(&b_id).await?;

        let outcome = self.resolver.resolve(&a.battle_view(), &b.battle_view());
        battle.resolve(outcome)?;

        self.battles
            .commit_resolution(&battle, &self.progression)
            .await
            .map_err(|e| match e {
                DomainError::Conflict(_) => {
                    tracing::warn!(battle_id = %battle_id, "Lost resolution race");
                    already_resolved(battle_id)
                }
                other => other,
            })?;

        tracing::info!(
            battle_id = %battle_id,
            winner_id = %outcome.winner_id,
            loser_id = %outcome.loser_id,
            experience_for_winner = outcome.experience_for_winner,
            experience_for_loser = outcome.experience_for_loser,
            "Battle resolved"
        );

        Ok(outcome)
    }

    /// Creator of the battle or owner of either participant
    async fn authorize(&self, battle: &Battle, user_id: &UserId) -> Result<(), AppError> {
        if battle.created_by_user_id == *user_id {
            return Ok(());
        }
        let (a, b) = battle.participants();
        if self.kittens.is_owner(&a, user_id).await? || self.kittens.is_owner(&b, user_id).await? {
            return Ok(());
        }

        tracing::warn!(
            battle_id = %battle.id,
            user_id = %user_id,
            "Rejected battle resolution by outsider"
        );
        Err(DomainError::Unauthorized(format!(
            "User {} may not resolve battle {}",
            user_id, battle.id
        ))
        .into())
    }

    async fn load_kitten(&self, id: &KittenId) -> Result<Kitten, AppError> {
        self.kittens
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::KittenNotFound(*id).into())
    }
}

fn already_resolved(battle_id: &BattleId) -> DomainError {
    DomainError::InvalidState(format!("Battle {} is already resolved", battle_id))
}
