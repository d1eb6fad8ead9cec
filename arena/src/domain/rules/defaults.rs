//! Default rule constants
//!
//! Every value here can be overridden through `Config`.

/// Skill points granted per level gained
pub const DEFAULT_SKILL_POINTS_PER_LEVEL: u32 = 3;

/// Base experience of the level curve (linear curve: base * level)
pub const DEFAULT_LEVEL_CURVE_BASE: u64 = 100;

/// Experience awarded to the winner of a battle
pub const DEFAULT_WINNER_EXPERIENCE: u64 = 50;

/// Experience awarded to the loser of a battle
pub const DEFAULT_LOSER_EXPERIENCE: u64 = 10;

/// Extra winner experience per level the loser had over the winner
pub const DEFAULT_UPSET_BONUS_PER_LEVEL: u64 = 10;

/// Maximum random power bonus per side; 0 disables variance
pub const DEFAULT_BATTLE_VARIANCE: u32 = 0;

/// Ability names are limited to this many characters
pub const MAX_ABILITY_NAME_LEN: usize = 50;
