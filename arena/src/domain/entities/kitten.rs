//! Kitten domain entity
//!
//! A user-owned creature that gains experience, levels up and fights battles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ability::AbilityId;
use super::user::UserId;

/// Unique identifier for a kitten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KittenId(pub Uuid);

impl KittenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KittenId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for KittenId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for KittenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_level() -> u32 {
    1
}

/// A kitten owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kitten {
    pub id: KittenId,
    pub owner_id: UserId,
    pub name: String,
    /// Always >= 1
    #[serde(default = "default_level")]
    pub level: u32,
    /// Experience accumulated toward the next level
    #[serde(default)]
    pub experience: u64,
    #[serde(default)]
    pub skill_points: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    /// Abilities currently bound to this kitten
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Kitten {
    /// Create a fresh level 1 kitten
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: KittenId::new(),
            owner_id,
            name: name.into(),
            level: 1,
            experience: 0,
            skill_points: 0,
            wins: 0,
            losses: 0,
            abilities: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id == *user_id
    }

    /// Snapshot of the stats that matter in a fight
    pub fn battle_view(&self) -> BattleKitten {
        BattleKitten {
            id: self.id,
            level: self.level,
            experience: self.experience,
            skill_points: self.skill_points,
            wins: self.wins,
            losses: self.losses,
            ability_count: self.abilities.len() as u32,
        }
    }

    pub fn record_win(&mut self) {
        self.wins = self.wins.saturating_add(1);
    }

    pub fn record_loss(&mut self) {
        self.losses = self.losses.saturating_add(1);
    }
}

/// Restricted view of a kitten used during battle resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BattleKitten {
    pub id: KittenId,
    pub level: u32,
    pub experience: u64,
    pub skill_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub ability_count: u32,
}

impl BattleKitten {
    /// Combat rating: level dominates, abilities and spent-or-unspent points tip it
    pub fn power(&self) -> u64 {
        u64::from(self.level) * 10
            + u64::from(self.ability_count) * 3
            + u64::from(self.skill_points)
            + u64::from(self.wins)
    }
}
