//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain rules and repository ports.

pub mod ability_service;
pub mod battle_service;
pub mod kitten_service;
pub mod requests;

pub use ability_service::AbilityService;
pub use battle_service::BattleService;
pub use kitten_service::{KittenService, ProgressReport};
pub use requests::{
    validate_ability_name, AbilityQuery, BattleQuery, GainExperience, GainExperienceRequest,
};
