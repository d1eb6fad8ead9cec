//! Progression engine
//!
//! Converts raw experience gains into level and skill-point increases.
//! The experience-to-level curve is a pluggable `LevelCurve`; remainder
//! experience carries over, so splitting a gain into several calls ends in
//! the same state as applying the sum at once.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_LEVEL_CURVE_BASE, DEFAULT_SKILL_POINTS_PER_LEVEL};
use crate::domain::entities::Kitten;
use crate::error::DomainError;

/// A validated, strictly positive experience gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExperienceGain(u64);

impl ExperienceGain {
    pub fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 1 {
            return Err(DomainError::InvalidAmount(format!(
                "Experience gain must be a positive integer, got {}",
                amount
            )));
        }
        Ok(Self(amount as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for ExperienceGain {
    type Error = DomainError;

    fn try_from(amount: u64) -> Result<Self, Self::Error> {
        if amount == 0 {
            return Err(DomainError::InvalidAmount(
                "Experience gain must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(Self(amount))
    }
}

/// A validated, strictly positive skill-points-per-level value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SkillPointsPerLevel(u32);

impl SkillPointsPerLevel {
    pub fn new(points: i64) -> Result<Self, DomainError> {
        if points < 1 || points > i64::from(u32::MAX) {
            return Err(DomainError::InvalidAmount(format!(
                "Skill points per level must be a positive integer, got {}",
                points
            )));
        }
        Ok(Self(points as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SkillPointsPerLevel {
    fn default() -> Self {
        Self(DEFAULT_SKILL_POINTS_PER_LEVEL)
    }
}

/// Experience needed to advance from one level to the next.
///
/// Implementations must be strictly increasing in `level` and never return 0.
/// `cost` must equal the sum of `threshold` over `from..to` and run in
/// constant time; the engine binary-searches it to apply large gains.
pub trait LevelCurve: Send + Sync + fmt::Debug {
    fn threshold(&self, level: u32) -> u64;

    /// Total experience to climb from `from` to `to` (`from <= to`),
    /// saturating at `u128::MAX`
    fn cost(&self, from: u32, to: u32) -> u128;
}

/// threshold = base * level
#[derive(Debug, Clone, Copy)]
pub struct LinearCurve {
    base: u64,
}

impl LinearCurve {
    pub fn new(base: u64) -> Self {
        Self { base: base.max(1) }
    }
}

impl LevelCurve for LinearCurve {
    fn threshold(&self, level: u32) -> u64 {
        self.base.saturating_mul(u64::from(level.max(1)))
    }

    fn cost(&self, from: u32, to: u32) -> u128 {
        let (from, to) = (u128::from(from.max(1)), u128::from(to.max(1)));
        if to <= from {
            return 0;
        }
        // from + (from + 1) + ... + (to - 1)
        let sum = (to - from) * (from + to - 1) / 2;
        sum.checked_mul(u128::from(self.base)).unwrap_or(u128::MAX)
    }
}

/// threshold = base * level^2
#[derive(Debug, Clone, Copy)]
pub struct QuadraticCurve {
    base: u64,
}

impl QuadraticCurve {
    pub fn new(base: u64) -> Self {
        Self { base: base.max(1) }
    }
}

impl LevelCurve for QuadraticCurve {
    fn threshold(&self, level: u32) -> u64 {
        let l = u64::from(level.max(1));
        self.base.saturating_mul(l.saturating_mul(l))
    }

    fn cost(&self, from: u32, to: u32) -> u128 {
        let (from, to) = (from.max(1), to.max(1));
        if to <= from {
            return 0;
        }
        let sum = sum_of_squares(to - 1) - sum_of_squares(from - 1);
        sum.checked_mul(u128::from(self.base)).unwrap_or(u128::MAX)
    }
}

/// 1² + 2² + ... + n²
fn sum_of_squares(n: u32) -> u128 {
    let n = u128::from(n);
    n * (n + 1) * (2 * n + 1) / 6
}

/// Curve selector used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelCurveKind {
    #[default]
    Linear,
    Quadratic,
}

impl LevelCurveKind {
    pub fn build(self, base: u64) -> Arc<dyn LevelCurve> {
        match self {
            LevelCurveKind::Linear => Arc::new(LinearCurve::new(base)),
            LevelCurveKind::Quadratic => Arc::new(QuadraticCurve::new(base)),
        }
    }
}

impl fmt::Display for LevelCurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelCurveKind::Linear => write!(f, "linear"),
            LevelCurveKind::Quadratic => write!(f, "quadratic"),
        }
    }
}

impl std::str::FromStr for LevelCurveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(LevelCurveKind::Linear),
            "quadratic" => Ok(LevelCurveKind::Quadratic),
            _ => Err(format!("Unknown level curve: {}", s)),
        }
    }
}

/// Applies experience to kittens using a level curve
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    curve: Arc<dyn LevelCurve>,
    skill_points_per_level: SkillPointsPerLevel,
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(LinearCurve::new(DEFAULT_LEVEL_CURVE_BASE)),
            SkillPointsPerLevel::default(),
        )
    }
}

impl ProgressionEngine {
    pub fn new(curve: Arc<dyn LevelCurve>, skill_points_per_level: SkillPointsPerLevel) -> Self {
        Self {
            curve,
            skill_points_per_level,
        }
    }

    /// Same curve, different skill-point grant
    pub fn with_skill_points_per_level(&self, skill_points_per_level: SkillPointsPerLevel) -> Self {
        Self {
            curve: Arc::clone(&self.curve),
            skill_points_per_level,
        }
    }

    pub fn skill_points_per_level(&self) -> SkillPointsPerLevel {
        self.skill_points_per_level
    }

    /// Experience needed to leave `level`
    pub fn threshold(&self, level: u32) -> u64 {
        self.curve.threshold(level).max(1)
    }

    /// Apply a raw gain. Non-positive gains fail with `InvalidAmount` and
    /// the kitten is left untouched.
    pub fn apply_experience(&self, kitten: &Kitten, gain: i64) -> Result<Kitten, DomainError> {
        let gain = ExperienceGain::new(gain)?;
        Ok(self.apply_gain(kitten, gain))
    }

    /// Apply an already validated gain, performing every level-up it pays
    /// for. The number of level-ups is found by binary search over
    /// `LevelCurve::cost`, so the work is bounded regardless of the gain.
    pub fn apply_gain(&self, kitten: &Kitten, gain: ExperienceGain) -> Kitten {
        let mut next = kitten.clone();
        next.level = next.level.max(1);
        next.experience = next.experience.saturating_add(gain.get());

        let available = u128::from(next.experience);
        let (mut low, mut high) = (0u32, u32::MAX - next.level);
        while low < high {
            let mid = low + (high - low).div_ceil(2);
            if self.curve.cost(next.level, next.level + mid) <= available {
                low = mid;
            } else {
                high = mid - 1;
            }
        }

        if low > 0 {
            // cost <= available, which came from a u64
            let spent = self.curve.cost(next.level, next.level + low) as u64;
            next.experience -= spent;
            next.level += low;
            next.skill_points = next
                .skill_points
                .saturating_add(low.saturating_mul(self.skill_points_per_level.get()));
        }

        next
    }
}

/// A kitten before and after one experience gain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub before: Kitten,
    pub after: Kitten,
}

impl Progress {
    pub fn levels_gained(&self) -> u32 {
        self.after.level.saturating_sub(self.before.level)
    }

    pub fn skill_points_gained(&self) -> u32 {
        self.after.skill_points.saturating_sub(self.before.skill_points)
    }
}
