//! Shared in-memory store
//!
//! All tables live behind one `tokio::sync::RwLock`. Mutating repository
//! methods take the write guard once and never await while holding it, so
//! every mutation is atomic and invisible until complete.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::{Ability, AbilityId, Battle, BattleId, Kitten, KittenId};

#[derive(Debug, Default)]
pub struct Tables {
    pub kittens: HashMap<KittenId, Kitten>,
    pub abilities: HashMap<AbilityId, Ability>,
    pub battles: HashMap<BattleId, Battle>,
}

impl Tables {
    /// Recompute a kitten's ability list from the ability table
    pub fn sync_kitten_abilities(&mut self, kitten_id: &KittenId) {
        let mut owned: Vec<&Ability> = self
            .abilities
            .values()
            .filter(|a| a.belongs_to(kitten_id))
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let ids = owned.into_iter().map(|a| a.id).collect();

        if let Some(kitten) = self.kittens.get_mut(kitten_id) {
            kitten.abilities = ids;
        }
    }
}

/// Cheaply cloneable handle to the in-memory tables
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    /// Insert or replace a kitten. Its ability list is derived from the
    /// ability table, not taken from the argument.
    pub async fn insert_kitten(&self, kitten: Kitten) {
        let mut tables = self.write().await;
        let id = kitten.id;
        tables.kittens.insert(id, kitten);
        tables.sync_kitten_abilities(&id);
    }

    pub async fn kitten_count(&self) -> usize {
        self.read().await.kittens.len()
    }
}
