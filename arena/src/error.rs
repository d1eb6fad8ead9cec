//! Unified error types for the arena core
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors raised by entities, ports and services
//! - `ConfigError`: Invalid environment configuration
//! - `AppError`: Application layer errors (wraps domain errors for callers)

use thiserror::Error;

use crate::domain::entities::{AbilityId, BattleId, KittenId};

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Kitten not found: {0}")]
    KittenNotFound(KittenId),

    #[error("Ability not found: {0}")]
    AbilityNotFound(AbilityId),

    #[error("Battle not found: {0}")]
    BattleNotFound(BattleId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    /// True for every "requested aggregate does not exist" kind
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::KittenNotFound(_)
                | DomainError::AbilityNotFound(_)
                | DomainError::BattleNotFound(_)
        )
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Application layer errors - returned by use-case services
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed data error: {0}")]
    Seed(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Seed(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Seed(e.to_string())
    }
}
