//! Domain entities
//!
//! Pure domain models for the three bounded contexts: kittens, abilities and battles.

pub mod ability;
pub mod battle;
pub mod kitten;
pub mod user;

pub use ability::{Ability, AbilityId, AbilityOrphanPolicy, NewAbility};
pub use battle::{Battle, BattleId, BattleOutcome, BattleStatus};
pub use kitten::{BattleKitten, Kitten, KittenId};
pub use user::UserId;
