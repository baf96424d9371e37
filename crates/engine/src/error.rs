//! The module contains the errors the engine can throw.
//!
//! The errors fall in four classes:
//!
//! - [`KeyNotFound`] when a travel, expense or budget reference does not resolve.
//! - [`Forbidden`] when the requester fails the membership check.
//! - validation errors ([`InvalidAmount`], [`InvalidSplit`], [`InvalidId`],
//!   [`InvalidBudget`], [`InvalidInput`]) for malformed input.
//! - persistence errors ([`Conflict`], [`Database`]); these are the only
//!   retryable ones.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidSplit`]: EngineError::InvalidSplit
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`InvalidBudget`]: EngineError::InvalidBudget
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`Conflict`]: EngineError::Conflict
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for storage-level failures the caller may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Database(_))
    }

    /// Returns `true` for malformed-input errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidSplit(_)
                | Self::InvalidId(_)
                | Self::InvalidBudget(_)
                | Self::InvalidInput(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidSplit(a), Self::InvalidSplit(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidBudget(a), Self::InvalidBudget(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_persistence_errors_are_retryable() {
        assert!(EngineError::Conflict("x".to_string()).is_retryable());
        assert!(EngineError::Database(DbErr::Custom("boom".to_string())).is_retryable());
        assert!(!EngineError::Forbidden("x".to_string()).is_retryable());
        assert!(!EngineError::KeyNotFound("x".to_string()).is_retryable());
        assert!(!EngineError::InvalidSplit("x".to_string()).is_retryable());
    }

    #[test]
    fn validation_class() {
        assert!(EngineError::InvalidAmount("x".to_string()).is_validation());
        assert!(EngineError::InvalidBudget("x".to_string()).is_validation());
        assert!(!EngineError::Conflict("x".to_string()).is_validation());
    }
}
