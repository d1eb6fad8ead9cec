//! In-memory adapters
//!
//! Implementations of the repository traits over a shared `MemoryDb`.

pub mod ability_repo;
pub mod battle_repo;
pub mod db;
pub mod kitten_repo;
pub mod seed;

pub use ability_repo::InMemoryAbilityRepository;
pub use battle_repo::InMemoryBattleRepository;
pub use db::{MemoryDb, Tables};
pub use kitten_repo::InMemoryKittenRepository;
pub use seed::{SeedData, SeedSummary};
