//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., the in-memory store).
//! List operations return an empty `Vec` rather than a not-found error.

use async_trait::async_trait;

use crate::domain::entities::{
    Ability, AbilityId, Battle, BattleId, Kitten, KittenId, UserId,
};
use crate::domain::rules::{ExperienceGain, Progress, ProgressionEngine};
use crate::error::DomainError;

/// Read-only kitten access, as seen from the abilities context
#[async_trait]
pub trait KittenReadRepository: Send + Sync {
    /// Find a kitten by ID
    async fn find_by_id(&self, id: &KittenId) -> Result<Option<Kitten>, DomainError>;

    /// Whether `user_id` owns the kitten; false for unknown kittens
    async fn is_kitten_owned_by_user(
        &self,
        kitten_id: &KittenId,
        user_id: &UserId,
    ) -> Result<bool, DomainError>;
}

/// Kitten access for battle resolution and progression.
///
/// Both mutating methods must be atomic at the storage boundary.
#[async_trait]
pub trait KittenRepository: KittenReadRepository {
    /// Apply an experience gain through `progression` and store the result.
    /// Returns the kitten as it was immediately before and after the write.
    /// Fails with `KittenNotFound` if the kitten does not exist.
    async fn update_experience(
        &self,
        kitten_id: &KittenId,
        gain: ExperienceGain,
        progression: &ProgressionEngine,
    ) -> Result<Progress, DomainError>;

    /// Record a win for `winner_id` and a loss for `loser_id` in one step.
    /// Fails with `KittenNotFound` (and mutates nothing) if either is absent.
    async fn update_stats(&self, winner_id: &KittenId, loser_id: &KittenId)
        -> Result<(), DomainError>;

    /// Whether `user_id` owns the kitten; false for unknown kittens
    async fn is_owner(&self, kitten_id: &KittenId, user_id: &UserId) -> Result<bool, DomainError>;
}

/// Repository for Ability entities
#[async_trait]
pub trait AbilityRepository: Send + Sync {
    /// Find an ability by ID
    async fn find_by_id(&self, id: &AbilityId) -> Result<Option<Ability>, DomainError>;

    /// Abilities bound to a kitten; empty for unknown kittens
    async fn find_by_kitten_id(&self, kitten_id: &KittenId) -> Result<Vec<Ability>, DomainError>;

    /// The full catalog
    async fn find_all(&self) -> Result<Vec<Ability>, DomainError>;

    /// Insert or replace
    async fn save(&self, ability: &Ability) -> Result<Ability, DomainError>;

    /// Remove an ability; returns whether it existed
    async fn delete(&self, id: &AbilityId) -> Result<bool, DomainError>;

    /// Bind a global ability to `kitten_id` in one step.
    ///
    /// Succeeds unchanged if it is already bound to that kitten. Fails with
    /// `AbilityNotFound` if absent and `InvalidState` if bound elsewhere.
    async fn bind(&self, id: &AbilityId, kitten_id: &KittenId) -> Result<Ability, DomainError>;
}

/// Repository for Battle entities
#[async_trait]
pub trait BattleRepository: Send + Sync {
    /// Store a new battle
    async fn create(&self, battle: &Battle) -> Result<Battle, DomainError>;

    /// Find a battle by ID
    async fn find_by_id(&self, id: &BattleId) -> Result<Option<Battle>, DomainError>;

    /// All battles, oldest first
    async fn find_all(&self) -> Result<Vec<Battle>, DomainError>;

    /// Battles created by a user, oldest first
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Battle>, DomainError>;

    /// Replace a stored battle.
    ///
    /// `battle.version` must equal the stored version; on success the stored
    /// copy carries `version + 1`. A stale version fails with `Conflict`.
    async fn update(&self, battle: &Battle) -> Result<Battle, DomainError>;

    /// Store a Resolved battle together with its consequences as one unit:
    /// the version check of `update`, a win and a loss on the two kittens,
    /// and both experience rewards applied through `progression` (zero
    /// rewards are skipped).
    ///
    /// Either everything is written or nothing is. Fails with `Conflict` on a
    /// stale version, `KittenNotFound` if a participant is gone and
    /// `InvalidState` if the battle carries no outcome.
    async fn commit_resolution(
        &self,
        battle: &Battle,
        progression: &ProgressionEngine,
    ) -> Result<Battle, DomainError>;
}
