//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;

use crate::domain::entities::{Ability, AbilityId, Kitten, KittenId, UserId};

/// Create a level 1 kitten with a fresh owner
pub fn test_kitten() -> Kitten {
    Kitten::new(UserId::new(), "test-kitten")
}

/// Create a kitten at a specific level with no banked experience
pub fn test_kitten_at_level(level: u32) -> Kitten {
    Kitten {
        level,
        name: format!("kitten-level-{}", level),
        ..test_kitten()
    }
}

/// Create a kitten owned by `owner_id`
pub fn test_kitten_owned_by(owner_id: UserId) -> Kitten {
    Kitten::new(owner_id, "owned-kitten")
}

/// Create an ability, optionally bound to a kitten
pub fn test_ability(name: &str, kitten_id: Option<KittenId>) -> Ability {
    Ability {
        id: AbilityId::new(),
        name: name.to_string(),
        description: Some(format!("{} test ability", name)),
        kitten_id,
        created_at: Utc::now(),
    }
}
