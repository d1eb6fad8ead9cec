//! Test utilities
//!
//! Fixtures and port doubles for unit testing. Services are tested against
//! the real in-memory adapters; the doubles here only add observation.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
