//! JSON seed data for the in-memory store

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;

use serde::Deserialize;

use super::db::MemoryDb;
use crate::domain::entities::{Ability, Battle, BattleStatus, Kitten, KittenId};
use crate::error::{AppError, DomainError};

/// Contents of a seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub kittens: Vec<Kitten>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub battles: Vec<Battle>,
}

/// Row counts after a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub kittens: usize,
    pub abilities: usize,
    pub battles: usize,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Check the cross-entity invariants before anything is loaded
    pub fn validate(&self) -> Result<(), DomainError> {
        let kitten_ids = unique_ids("kitten", self.kittens.iter().map(|k| k.id))?;
        unique_ids("ability", self.abilities.iter().map(|a| a.id))?;
        unique_ids("battle", self.battles.iter().map(|b| b.id))?;

        if let Some(kitten) = self.kittens.iter().find(|k| k.level == 0) {
            return Err(DomainError::Validation(format!(
                "Kitten {} has level 0",
                kitten.id
            )));
        }

        for ability in &self.abilities {
            if let Some(kitten_id) = ability.kitten_id {
                if !kitten_ids.contains(&kitten_id) {
                    return Err(DomainError::KittenNotFound(kitten_id));
                }
            }
        }

        for battle in &self.battles {
            let (a, b) = battle.participants();
            if a == b {
                return Err(DomainError::Validation(format!(
                    "Battle {} pits a kitten against itself",
                    battle.id
                )));
            }
            for id in [a, b] {
                if !kitten_ids.contains(&id) {
                    return Err(DomainError::KittenNotFound(id));
                }
            }
            match (battle.status, battle.winner_id) {
                (BattleStatus::Resolved, None) => {
                    return Err(DomainError::Validation(format!(
                        "Resolved battle {} has no winner",
                        battle.id
                    )))
                }
                (BattleStatus::Pending, Some(_)) => {
                    return Err(DomainError::Validation(format!(
                        "Pending battle {} already names a winner",
                        battle.id
                    )))
                }
                _ => {}
            }
            if battle.status == BattleStatus::Pending && battle.outcome.is_some() {
                return Err(DomainError::Validation(format!(
                    "Pending battle {} already carries an outcome",
                    battle.id
                )));
            }
            if let Some(winner) = battle.winner_id {
                if !battle.involves(&winner) {
                    return Err(DomainError::Validation(format!(
                        "Battle {} names a winner that did not take part",
                        battle.id
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Collect ids, failing with `Validation` on the first repeat
fn unique_ids<T>(kind: &str, ids: impl Iterator<Item = T>) -> Result<HashSet<T>, DomainError>
where
    T: Eq + Hash + Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if seen.contains(&id) {
            return Err(DomainError::Validation(format!(
                "Duplicate {} id {}",
                kind, id
            )));
        }
        seen.insert(id);
    }
    Ok(seen)
}

impl MemoryDb {
    /// Validate and load seed data, replacing rows with the same ids
    pub async fn load_seed(&self, seed: SeedData) -> Result<SeedSummary, DomainError> {
        seed.validate()?;

        let summary = SeedSummary {
            kittens: seed.kittens.len(),
            abilities: seed.abilities.len(),
            battles: seed.battles.len(),
        };

        let mut tables = self.write().await;
        let kitten_ids: Vec<KittenId> = seed.kittens.iter().map(|k| k.id).collect();
        for kitten in seed.kittens {
            tables.kittens.insert(kitten.id, kitten);
        }
        for ability in seed.abilities {
            tables.abilities.insert(ability.id, ability);
        }
        for battle in seed.battles {
            tables.battles.insert(battle.id, battle);
        }
        for id in &kitten_ids {
            tables.sync_kitten_abilities(id);
        }

        tracing::info!(
            kittens = summary.kittens,
            abilities = summary.abilities,
            battles = summary.battles,
            "Seed data loaded"
        );

        Ok(summary)
    }
}
