//! Battle resolver
//!
//! Decides the winner of a battle from two combat snapshots and computes the
//! experience each side earns. Resolution is deterministic: the only source
//! of randomness is an explicitly configured seed.
//!
//! Ordering rule: higher power wins; on equal power the higher level wins;
//! on equal level the kitten with the smaller id (UUID byte order) wins.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::defaults::{
    DEFAULT_BATTLE_VARIANCE, DEFAULT_LOSER_EXPERIENCE, DEFAULT_UPSET_BONUS_PER_LEVEL,
    DEFAULT_WINNER_EXPERIENCE,
};
use crate::domain::entities::{BattleKitten, BattleOutcome, KittenId};

/// Experience handed out after a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRewards {
    pub winner_experience: u64,
    pub loser_experience: u64,
    pub upset_bonus_per_level: u64,
}

impl Default for BattleRewards {
    fn default() -> Self {
        Self {
            winner_experience: DEFAULT_WINNER_EXPERIENCE,
            loser_experience: DEFAULT_LOSER_EXPERIENCE,
            upset_bonus_per_level: DEFAULT_UPSET_BONUS_PER_LEVEL,
        }
    }
}

impl BattleRewards {
    /// (winner, loser) experience; the loser never earns more than the winner
    fn award(&self, winner: &BattleKitten, loser: &BattleKitten) -> (u64, u64) {
        let level_gap = u64::from(loser.level.saturating_sub(winner.level));
        let for_winner = self
            .winner_experience
            .saturating_add(self.upset_bonus_per_level.saturating_mul(level_gap));
        let for_loser = self.loser_experience.min(for_winner);
        (for_winner, for_loser)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BattleResolver {
    rewards: BattleRewards,
    variance: u32,
    seed: Option<u64>,
}

impl BattleResolver {
    pub fn new(rewards: BattleRewards) -> Self {
        Self {
            rewards,
            variance: DEFAULT_BATTLE_VARIANCE,
            seed: None,
        }
    }

    /// Enable a seeded power roll in `0..=variance` per side
    pub fn with_variance(mut self, variance: u32, seed: u64) -> Self {
        self.variance = variance;
        self.seed = Some(seed);
        self
    }

    pub fn resolve(&self, a: &BattleKitten, b: &BattleKitten) -> BattleOutcome {
        let (roll_a, roll_b) = self.rolls(&a.id, &b.id);
        let power_a = a.power().saturating_add(roll_a);
        let power_b = b.power().saturating_add(roll_b);

        let a_wins = match power_a.cmp(&power_b) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match a.level.cmp(&b.level) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => a.id <= b.id,
            },
        };

        let (winner, loser) = if a_wins { (a, b) } else { (b, a) };
        let (experience_for_winner, experience_for_loser) = self.rewards.award(winner, loser);

        tracing::debug!(
            winner_id = %winner.id,
            loser_id = %loser.id,
            power_a = power_a,
            power_b = power_b,
            "Battle resolved"
        );

        BattleOutcome {
            winner_id: winner.id,
            loser_id: loser.id,
            experience_for_winner,
            experience_for_loser,
        }
    }

    /// Per-side rolls. Each kitten's roll depends only on the seed and the
    /// pairing, not on argument order.
    fn rolls(&self, a: &KittenId, b: &KittenId) -> (u64, u64) {
        let seed = match self.seed {
            Some(seed) if self.variance > 0 => seed,
            _ => return (0, 0),
        };

        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let mut rng = StdRng::seed_from_u64(seed ^ fold_id(first) ^ fold_id(second).rotate_left(17));
        let first_roll = u64::from(rng.gen_range(0..=self.variance));
        let second_roll = u64::from(rng.gen_range(0..=self.variance));

        if a <= b {
            (first_roll, second_roll)
        } else {
            (second_roll, first_roll)
        }
    }
}

fn fold_id(id: &KittenId) -> u64 {
    let bits = id.0.as_u128();
    (bits as u64) ^ ((bits >> 64) as u64)
}
