//! Application-layer errors.

use akwaaba_persistence::PersistenceError;
use thiserror::Error;

/// Errors raised by account, catalog and box office operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The requested entity does not exist or is not visible to the caller.
    #[error("{0} not found")]
    NotFound(String),

    /// Input failed validation; every problem is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Missing, expired or wrong credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Not enough tickets left for the requested quantity.
    #[error("only {available} ticket(s) left")]
    SoldOut { available: u32 },

    /// The tier is outside its sales window.
    #[error("ticket sales are closed for this tier")]
    SalesClosed,

    /// Quantity is zero or above the per-order limit.
    #[error("{0}")]
    InvalidQuantity(String),

    /// The client's expected total differs from the computed total.
    #[error("amount mismatch: expected {expected}, actual {actual}")]
    AmountMismatch { expected: u64, actual: u64 },

    /// Storage failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// CSV encoding failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl CoreError {
    /// Shorthand for a single validation message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Shorthand for a missing entity.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Returns true for errors caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Persistence(_) | Self::LockPoisoned(_) | Self::PasswordHash(_) | Self::Export(_)
        )
    }
}

/// Result alias for application-layer operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Maps a poisoned lock into [`CoreError::LockPoisoned`].
pub(crate) fn poisoned<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::LockPoisoned(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins() {
        let err = CoreError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "validation failed: a; b");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CoreError::SalesClosed.is_client_error());
        assert!(CoreError::SoldOut { available: 0 }.is_client_error());
        assert!(!CoreError::LockPoisoned("x".to_string()).is_client_error());
    }
}
