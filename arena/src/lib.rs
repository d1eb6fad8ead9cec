//! Kitten Arena core
//!
//! Battle resolution and kitten progression for a creature-collection game.
//! Uses hexagonal (ports & adapters) architecture: use-case services depend on
//! repository traits, and the composition root wires concrete adapters in.

use std::sync::Arc;

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;


use adapters::{
    InMemoryAbilityRepository, InMemoryBattleRepository, InMemoryKittenRepository, MemoryDb,
};
use app::{AbilityService, BattleService, KittenService};
use config::Config;

/// Services wired to the in-memory adapters
#[derive(Clone)]
pub struct AppState {
    pub ability_service: Arc<AbilityService<InMemoryAbilityRepository, InMemoryKittenRepository>>,
    pub battle_service: Arc<BattleService<InMemoryBattleRepository, InMemoryKittenRepository>>,
    pub kitten_service: Arc<KittenService<InMemoryKittenRepository>>,
    pub db: MemoryDb,
    pub config: Config,
}

impl AppState {
    /// Composition root: one adapter per port, shared by every service
    pub fn build(config: Config, db: MemoryDb) -> Self {
        let kitten_repo = Arc::new(InMemoryKittenRepository::new(db.clone()));
        let ability_repo = Arc::new(InMemoryAbilityRepository::new(db.clone()));
        let battle_repo = Arc::new(InMemoryBattleRepository::new(db.clone()));
        let progression = config.progression_engine();

        let ability_service = Arc::new(AbilityService::new(
            ability_repo,
            kitten_repo.clone(),
            config.ability_orphan_policy,
        ));

        let battle_service = Arc::new(BattleService::new(
            battle_repo,
            kitten_repo.clone(),
            config.battle_resolver(),
            progression.clone(),
        ));

        let kitten_service = Arc::new(KittenService::new(kitten_repo, progression));

        Self {
            ability_service,
            battle_service,
            kitten_service,
            db,
            config,
        }
    }
}
