//! Boundary requests
//!
//! Raw caller input is deserialized into these types and validated into
//! domain commands before any service is invoked.

use serde::Deserialize;

use crate::domain::entities::{KittenId, UserId};
use crate::domain::rules::defaults::MAX_ABILITY_NAME_LEN;
use crate::domain::rules::{ExperienceGain, SkillPointsPerLevel};
use crate::error::DomainError;

/// Filter for listing abilities
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AbilityQuery {
    #[serde(default)]
    pub kitten_id: Option<KittenId>,
}

/// Filter for listing battles
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BattleQuery {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Unvalidated experience grant as received from a caller
#[derive(Debug, Clone, Deserialize)]
pub struct GainExperienceRequest {
    pub experience: i64,
    #[serde(default)]
    pub skill_points_per_level: Option<i64>,
}

/// Validated experience grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GainExperience {
    pub gain: ExperienceGain,
    pub skill_points_per_level: Option<SkillPointsPerLevel>,
}

impl GainExperienceRequest {
    pub fn validate(&self) -> Result<GainExperience, DomainError> {
        let gain = ExperienceGain::new(self.experience)?;
        let skill_points_per_level = self
            .skill_points_per_level
            .map(SkillPointsPerLevel::new)
            .transpose()?;

        Ok(GainExperience {
            gain,
            skill_points_per_level,
        })
    }
}

/// Trimmed, non-empty name of bounded length
pub fn validate_ability_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_ABILITY_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "Ability name must be between 1 and {} characters",
            MAX_ABILITY_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}
