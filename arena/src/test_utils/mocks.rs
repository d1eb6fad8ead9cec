//! Port doubles
//!
//! Wrappers around real adapters that observe or disturb how a port is used.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::adapters::MemoryDb;
use crate::domain::entities::{Battle, BattleId, KittenId, UserId};
use crate::domain::ports::BattleRepository;
use crate::domain::rules::ProgressionEngine;
use crate::error::DomainError;

// ============================================================================
// Counting Battle Repository
// ============================================================================

/// Delegates to `inner` and counts successful resolution commits
pub struct CountingBattleRepository<R> {
    inner: R,
    commits: AtomicUsize,
}

impl<R> CountingBattleRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            commits: AtomicUsize::new(0),
        }
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: BattleRepository> BattleRepository for CountingBattleRepository<R> {
    async fn create(&self, battle: &Battle) -> Result<Battle, DomainError> {
        self.inner.create(battle).await
    }

    async fn find_by_id(&self, id: &BattleId) -> Result<Option<Battle>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Battle>, DomainError> {
        self.inner.find_all().await
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Battle>, DomainError> {
        self.inner.find_by_user_id(user_id).await
    }

    async fn update(&self, battle: &Battle) -> Result<Battle, DomainError> {
        self.inner.update(battle).await
    }

    async fn commit_resolution(
        &self,
        battle: &Battle,
        progression: &ProgressionEngine,
    ) -> Result<Battle, DomainError> {
        let stored = self.inner.commit_resolution(battle, progression).await?;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }
}

// ============================================================================
// Kitten Removing Battle Repository
// ============================================================================

/// Removes `kitten_id` from the store right before the first resolution
/// commit, as a deletion landing between load and persist would
pub struct KittenRemovingBattleRepository<R> {
    inner: R,
    db: MemoryDb,
    kitten_id: KittenId,
    armed: AtomicBool,
}

impl<R> KittenRemovingBattleRepository<R> {
    pub fn new(inner: R, db: MemoryDb, kitten_id: KittenId) -> Self {
        Self {
            inner,
            db,
            kitten_id,
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl<R: BattleRepository> BattleRepository for KittenRemovingBattleRepository<R> {
    async fn create(&self, battle: &Battle) -> Result<Battle, DomainError> {
        self.inner.create(battle).await
    }

    async fn find_by_id(&self, id: &BattleId) -> Result<Option<Battle>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Battle>, DomainError> {
        self.inner.find_all().await
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Battle>, DomainError> {
        self.inner.find_by_user_id(user_id).await
    }

    async fn update(&self, battle: &Battle) -> Result<Battle, DomainError> {
        self.inner.update(battle).await
    }

    async fn commit_resolution(
        &self,
        battle: &Battle,
        progression: &ProgressionEngine,
    ) -> Result<Battle, DomainError> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.db.write().await.kittens.remove(&self.kitten_id);
        }
        self.inner.commit_resolution(battle, progression).await
    }
}
