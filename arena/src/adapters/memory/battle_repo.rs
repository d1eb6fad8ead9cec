//! In-memory adapter for BattleRepository
//!
//! `commit_resolution` writes the battle and both kittens under a single
//! write guard; every check runs before the first mutation.

use async_trait::async_trait;

use super::db::MemoryDb;
use crate::domain::entities::{Battle, BattleId, UserId};
use crate::domain::ports::BattleRepository;
use crate::domain::rules::{ExperienceGain, ProgressionEngine};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct InMemoryBattleRepository {
    db: MemoryDb,
}

impl InMemoryBattleRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

fn oldest_first(mut battles: Vec<Battle>) -> Vec<Battle> {
    battles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    battles
}

#[async_trait]
impl BattleRepository for InMemoryBattleRepository {
    async fn create(&self, battle: &Battle) -> Result<Battle, DomainError> {
        let mut tables = self.db.write().await;
        if tables.battles.contains_key(&battle.id) {
            return Err(DomainError::Conflict(format!(
                "Battle {} already exists",
                battle.id
            )));
        }
        tables.battles.insert(battle.id, battle.clone());
        Ok(battle.clone())
    }

    async fn find_by_id(&self, id: &BattleId) -> Result<Option<Battle>, DomainError> {
        Ok(self.db.read().await.battles.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Battle>, DomainError> {
        let tables = self.db.read().await;
        Ok(oldest_first(tables.battles.values().cloned().collect()))
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Battle>, DomainError> {
        let tables = self.db.read().await;
        Ok(oldest_first(
            tables
                .battles
                .values()
                .filter(|b| b.created_by_user_id == *user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, battle: &Battle) -> Result<Battle, DomainError> {
        let mut tables = self.db.write().await;
        let stored = tables
            .battles
            .get_mut(&battle.id)
            .ok_or(DomainError::BattleNotFound(battle.id))?;

        if stored.version != battle.version {
            return Err(DomainError::Conflict(format!(
                "Battle {} was modified concurrently (expected version {}, found {})",
                battle.id, battle.version, stored.version
            )));
        }

        let mut next = battle.clone();
        next.version = battle.version.wrapping_add(1);
        *stored = next.clone();
        Ok(next)
    }

    async fn commit_resolution(
        &self,
        battle: &Battle,
        progression: &ProgressionEngine,
    ) -> Result<Battle, DomainError> {
        let outcome = battle.outcome.ok_or_else(|| {
            DomainError::InvalidState(format!("Battle {} has no outcome to commit", battle.id))
        })?;

        let mut tables = self.db.write().await;
        let stored = tables
            .battles
            .get(&battle.id)
            .ok_or(DomainError::BattleNotFound(battle.id))?;
        if stored.version != battle.version {
            return Err(DomainError::Conflict(format!(
                "Battle {} was modified concurrently (expected version {}, found {})",
                battle.id, battle.version, stored.version
            )));
        }

        let mut winner = tables
            .kittens
            .get(&outcome.winner_id)
            .cloned()
            .ok_or(DomainError::KittenNotFound(outcome.winner_id))?;
        let mut loser = tables
            .kittens
            .get(&outcome.loser_id)
            .cloned()
            .ok_or(DomainError::KittenNotFound(outcome.loser_id))?;

        winner.record_win();
        loser.record_loss();
        if let Ok(gain) = ExperienceGain::try_from(outcome.experience_for_winner) {
            winner = progression.apply_gain(&winner, gain);
        }
        if let Ok(gain) = ExperienceGain::try_from(outcome.experience_for_loser) {
            loser = progression.apply_gain(&loser, gain);
        }

        let mut next = battle.clone();
        next.version = battle.version.wrapping_add(1);
        tables.kittens.insert(winner.id, winner);
        tables.kittens.insert(loser.id, loser);
        tables.battles.insert(next.id, next.clone());
        Ok(next)
    }
}
