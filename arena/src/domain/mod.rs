//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Kittens, abilities and battles
//! - `rules`: Progression engine and battle resolver
//! - `ports`: Trait definitions for persistence

pub mod entities;
pub mod ports;
pub mod rules;
