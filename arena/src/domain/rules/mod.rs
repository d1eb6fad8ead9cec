//! Domain rules
//!
//! Pure battle and progression logic. No I/O; services feed these with
//! aggregates loaded through the ports.

pub mod defaults;
pub mod progression;
pub mod resolver;

pub use progression::{
    ExperienceGain, LevelCurve, LevelCurveKind, LinearCurve, Progress, ProgressionEngine,
    QuadraticCurve, SkillPointsPerLevel,
};
pub use resolver::{BattleResolver, BattleRewards};
