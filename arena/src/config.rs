use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::entities::AbilityOrphanPolicy;
use crate::domain::rules::defaults::{
    DEFAULT_BATTLE_VARIANCE, DEFAULT_LEVEL_CURVE_BASE, DEFAULT_LOSER_EXPERIENCE,
    DEFAULT_SKILL_POINTS_PER_LEVEL, DEFAULT_UPSET_BONUS_PER_LEVEL, DEFAULT_WINNER_EXPERIENCE,
};
use crate::domain::rules::{
    BattleResolver, BattleRewards, LevelCurveKind, ProgressionEngine, SkillPointsPerLevel,
};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub skill_points_per_level: SkillPointsPerLevel,
    pub level_curve: LevelCurveKind,
    pub level_curve_base: u64,
    pub winner_experience: u64,
    pub loser_experience: u64,
    pub upset_bonus_per_level: u64,
    /// Seeded power variance; only used when `battle_seed` is set
    pub battle_variance: u32,
    pub battle_seed: Option<u64>,
    pub ability_orphan_policy: AbilityOrphanPolicy,
    /// JSON file loaded into the in-memory store at startup
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skill_points_per_level: SkillPointsPerLevel::default(),
            level_curve: LevelCurveKind::default(),
            level_curve_base: DEFAULT_LEVEL_CURVE_BASE,
            winner_experience: DEFAULT_WINNER_EXPERIENCE,
            loser_experience: DEFAULT_LOSER_EXPERIENCE,
            upset_bonus_per_level: DEFAULT_UPSET_BONUS_PER_LEVEL,
            battle_variance: DEFAULT_BATTLE_VARIANCE,
            battle_seed: None,
            ability_orphan_policy: AbilityOrphanPolicy::default(),
            seed_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let skill_points: i64 = parse_or(
            &lookup,
            "ARENA_SKILL_POINTS_PER_LEVEL",
            i64::from(DEFAULT_SKILL_POINTS_PER_LEVEL),
        )?;
        let skill_points_per_level =
            SkillPointsPerLevel::new(skill_points).map_err(|_| ConfigError::InvalidValue {
                key: "ARENA_SKILL_POINTS_PER_LEVEL",
                value: skill_points.to_string(),
            })?;

        let level_curve_base: u64 =
            parse_or(&lookup, "ARENA_LEVEL_CURVE_BASE", DEFAULT_LEVEL_CURVE_BASE)?;
        if level_curve_base == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ARENA_LEVEL_CURVE_BASE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            skill_points_per_level,
            level_curve: parse_or(&lookup, "ARENA_LEVEL_CURVE", LevelCurveKind::default())?,
            level_curve_base,
            winner_experience: parse_or(
                &lookup,
                "ARENA_WINNER_EXPERIENCE",
                DEFAULT_WINNER_EXPERIENCE,
            )?,
            loser_experience: parse_or(&lookup, "ARENA_LOSER_EXPERIENCE", DEFAULT_LOSER_EXPERIENCE)?,
            upset_bonus_per_level: parse_or(
                &lookup,
                "ARENA_UPSET_BONUS_PER_LEVEL",
                DEFAULT_UPSET_BONUS_PER_LEVEL,
            )?,
            battle_variance: parse_or(&lookup, "ARENA_BATTLE_VARIANCE", DEFAULT_BATTLE_VARIANCE)?,
            battle_seed: parse_opt(&lookup, "ARENA_BATTLE_SEED")?,
            ability_orphan_policy: parse_or(
                &lookup,
                "ARENA_ABILITY_ORPHAN_POLICY",
                AbilityOrphanPolicy::default(),
            )?,
            seed_file: lookup("ARENA_SEED_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn progression_engine(&self) -> ProgressionEngine {
        ProgressionEngine::new(
            self.level_curve.build(self.level_curve_base),
            self.skill_points_per_level,
        )
    }

    pub fn battle_resolver(&self) -> BattleResolver {
        let resolver = BattleResolver::new(BattleRewards {
            winner_experience: self.winner_experience,
            loser_experience: self.loser_experience,
            upset_bonus_per_level: self.upset_bonus_per_level,
        });
        match self.battle_seed {
            Some(seed) => resolver.with_variance(self.battle_variance, seed),
            None => resolver,
        }
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        _ => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(
            config.skill_points_per_level.get(),
            DEFAULT_SKILL_POINTS_PER_LEVEL
        );
        assert_eq!(config.level_curve, LevelCurveKind::Linear);
        assert_eq!(config.winner_experience, DEFAULT_WINNER_EXPERIENCE);
        assert!(config.battle_seed.is_none());
        assert!(config.seed_file.is_none());
        assert_eq!(config.ability_orphan_policy, AbilityOrphanPolicy::Orphan);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ARENA_SKILL_POINTS_PER_LEVEL", "5"),
            ("ARENA_LEVEL_CURVE", "quadratic"),
            ("ARENA_LEVEL_CURVE_BASE", "20"),
            ("ARENA_BATTLE_SEED", "99"),
            ("ARENA_BATTLE_VARIANCE", "15"),
            ("ARENA_ABILITY_ORPHAN_POLICY", "cascade"),
            ("ARENA_SEED_FILE", "/tmp/seed.json"),
        ]))
        .unwrap();

        assert_eq!(config.skill_points_per_level.get(), 5);
        assert_eq!(config.level_curve, LevelCurveKind::Quadratic);
        assert_eq!(config.progression_engine().threshold(2), 80);
        assert_eq!(config.battle_seed, Some(99));
        assert_eq!(config.battle_variance, 15);
        assert_eq!(config.ability_orphan_policy, AbilityOrphanPolicy::Cascade);
        assert_eq!(config.seed_file, Some(PathBuf::from("/tmp/seed.json")));
    }

    #[test]
    fn rejects_non_positive_skill_points() {
        let err = Config::from_lookup(lookup(&[("ARENA_SKILL_POINTS_PER_LEVEL", "0")]))
            .unwrap_err();

        assert!(err.to_string().contains("ARENA_SKILL_POINTS_PER_LEVEL"));
    }

    #[test]
    fn rejects_unparsable_values() {
        assert!(Config::from_lookup(lookup(&[("ARENA_WINNER_EXPERIENCE", "lots")])).is_err());
        assert!(Config::from_lookup(lookup(&[("ARENA_LEVEL_CURVE", "cubic")])).is_err());
        assert!(Config::from_lookup(lookup(&[("ARENA_LEVEL_CURVE_BASE", "0")])).is_err());
    }

    #[test]
    fn default_matches_empty_environment() {
        let from_env = Config::from_lookup(lookup(&[])).unwrap();
        let default = Config::default();

        assert_eq!(from_env.level_curve_base, default.level_curve_base);
        assert_eq!(from_env.loser_experience, default.loser_experience);
        assert_eq!(from_env.battle_variance, default.battle_variance);
    }
}
