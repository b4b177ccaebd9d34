//! Error taxonomy for authentication and storage operations.
//!
//! Store adapters never surface their own error types to callers: every
//! persistence failure is wrapped in [`StoreError`] at the adapter boundary
//! and carried through the service as [`AuthError::Store`].

use thiserror::Error;

/// Persistence failure (connectivity, corruption, unexpected constraint
/// violations). Distinct from "record not found", which is an `Ok(None)`.
#[derive(Debug, Error)]
#[error("store error: {source}")]
pub struct StoreError {
    #[from]
    source: anyhow::Error,
}

impl StoreError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            source: anyhow::anyhow!(message.into()),
        }
    }
}

/// Outcomes of authentication operations.
///
/// `UserNotFound` and `WrongPassword` stay distinct here; presenting them
/// identically to end users is a choice left to the HTTP layer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("username already taken")]
    UsernameTaken,

    #[error("unknown username")]
    UserNotFound,

    #[error("invalid password")]
    WrongPassword,

    #[error("account locked, retry in {retry_after_seconds}s")]
    AccountLocked { retry_after_seconds: u64 },

    #[error("password hashing failed")]
    Hashing(#[source] bcrypt::BcryptError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// True for errors the caller can recover from by changing input.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Hashing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_keeps_context() {
        let err = StoreError::new("connection refused");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn locked_error_reports_remaining_seconds() {
        let err = AuthError::AccountLocked {
            retry_after_seconds: 42,
        };
        assert_eq!(err.to_string(), "account locked, retry in 42s");
    }

    #[test]
    fn recoverable_classification() {
        assert!(AuthError::UsernameTaken.is_recoverable());
        assert!(AuthError::WrongPassword.is_recoverable());
        assert!(
            AuthError::Validation("Username cannot be empty.".to_string()).is_recoverable()
        );
        assert!(!AuthError::Store(StoreError::new("down")).is_recoverable());
    }
}
