//! Battle domain entity
//!
//! A battle pairs two kittens and, once resolved, records a winner.
//! Battles move Pending -> Resolved exactly once and are never reopened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kitten::KittenId;
use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleId(pub Uuid);

impl BattleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BattleId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BattleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BattleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleStatus {
    #[default]
    Pending,
    Resolved,
}

impl std::fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattleStatus::Pending => write!(f, "pending"),
            BattleStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for BattleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BattleStatus::Pending),
            "resolved" => Ok(BattleStatus::Resolved),
            _ => Err(format!("Unknown battle status: {}", s)),
        }
    }
}

/// Result of resolving a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner_id: KittenId,
    pub loser_id: KittenId,
    pub experience_for_winner: u64,
    pub experience_for_loser: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    pub participant_a_id: KittenId,
    pub participant_b_id: KittenId,
    #[serde(default)]
    pub winner_id: Option<KittenId>,
    pub created_by_user_id: UserId,
    #[serde(default)]
    pub status: BattleStatus,
    #[serde(default)]
    pub outcome: Option<BattleOutcome>,
    /// Optimistic concurrency token, bumped by every successful update
    #[serde(default)]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Battle {
    /// Create a pending battle between two distinct kittens
    pub fn new(
        created_by_user_id: UserId,
        participant_a_id: KittenId,
        participant_b_id: KittenId,
    ) -> Result<Self, DomainError> {
        if participant_a_id == participant_b_id {
            return Err(DomainError::Validation(
                "A kitten cannot battle itself".to_string(),
            ));
        }

        Ok(Self {
            id: BattleId::new(),
            participant_a_id,
            participant_b_id,
            winner_id: None,
            created_by_user_id,
            status: BattleStatus::Pending,
            outcome: None,
            version: 0,
            created_at: Utc::now(),
            resolved_at: None,
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.status == BattleStatus::Resolved
    }

    pub fn involves(&self, kitten_id: &KittenId) -> bool {
        self.participant_a_id == *kitten_id || self.participant_b_id == *kitten_id
    }

    pub fn participants(&self) -> (KittenId, KittenId) {
        (self.participant_a_id, self.participant_b_id)
    }

    /// Record the outcome and move to Resolved.
    ///
    /// Fails with `InvalidState` if already resolved, and with `Validation`
    /// if the outcome names kittens that are not the two participants.
    pub fn resolve(&mut self, outcome: BattleOutcome) -> Result<(), DomainError> {
        if self.is_resolved() {
            return Err(DomainError::InvalidState(format!(
                "Battle {} is already resolved",
                self.id
            )));
        }

        let (a, b) = self.participants();
        let pairing_matches = (outcome.winner_id == a && outcome.loser_id == b)
            || (outcome.winner_id == b && outcome.loser_id == a);
        if !pairing_matches {
            return Err(DomainError::Validation(format!(
                "Outcome does not match the participants of battle {}",
                self.id
            )));
        }

        self.winner_id = Some(outcome.winner_id);
        self.outcome = Some(outcome);
        self.status = BattleStatus::Resolved;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }
}
