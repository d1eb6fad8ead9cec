//! Ability domain entity
//!
//! A named capability, either global (unassigned) or bound to one kitten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kitten::KittenId;

/// Unique identifier for an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub Uuid);

impl AbilityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AbilityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AbilityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` means global/unassigned
    #[serde(default)]
    pub kitten_id: Option<KittenId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Ability {
    pub fn is_global(&self) -> bool {
        self.kitten_id.is_none()
    }

    pub fn belongs_to(&self, kitten_id: &KittenId) -> bool {
        self.kitten_id.as_ref() == Some(kitten_id)
    }
}

/// Data needed to create a new ability
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAbility {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kitten_id: Option<KittenId>,
}

impl NewAbility {
    pub fn into_ability(self) -> Ability {
        Ability {
            id: AbilityId::new(),
            name: self.name,
            description: self.description,
            kitten_id: self.kitten_id,
            created_at: Utc::now(),
        }
    }
}

/// What happens to a kitten's abilities when the kitten goes away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityOrphanPolicy {
    /// Abilities become global
    #[default]
    Orphan,
    /// Abilities are deleted with the kitten
    Cascade,
}

impl std::fmt::Display for AbilityOrphanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbilityOrphanPolicy::Orphan => write!(f, "orphan"),
            AbilityOrphanPolicy::Cascade => write!(f, "cascade"),
        }
    }
}

impl std::str::FromStr for AbilityOrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orphan" => Ok(AbilityOrphanPolicy::Orphan),
            "cascade" => Ok(AbilityOrphanPolicy::Cascade),
            _ => Err(format!("Unknown ability orphan policy: {}", s)),
        }
    }
}
