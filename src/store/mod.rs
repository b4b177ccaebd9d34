//! Storage contracts for user records and sessions.
//!
//! The authentication service only sees these traits; adapters own the
//! representation. Callers always receive the canonical [`UserRecord`] and
//! [`SessionRecord`] types, never raw rows.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::auth::error::StoreError;
use crate::auth::rbac::Role;

/// Canonical user record produced by every adapter.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A valid session, as returned from lookups.
///
/// The token itself is not echoed back: stores keep only its hash.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Tri-state update for a nullable field: leave it alone, set a value, or
/// clear it to NULL. Replaces sentinel values like the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

/// Partial update of the mutable user fields.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub failed_attempts: Option<u32>,
    pub locked_until: FieldUpdate<DateTime<Utc>>,
}

impl UserUpdate {
    /// Reset the failure counter and drop any lock.
    #[must_use]
    pub fn clear_lock() -> Self {
        Self {
            failed_attempts: Some(0),
            locked_until: FieldUpdate::Clear,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none()
            && self.role.is_none()
            && self.failed_attempts.is_none()
            && self.locked_until == FieldUpdate::Keep
    }
}

/// Counter state after a recorded login failure.
#[derive(Debug, Clone, Copy)]
pub struct FailureState {
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl FailureState {
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked_until.is_some()
    }
}

/// Durable store of user records, keyed by username.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Point lookup by the unique username.
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new record with a zeroed failure counter and no lock.
    /// Returns `false` when the username is already taken; uniqueness is
    /// enforced by the store itself, not by a prior read.
    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<bool, StoreError>;

    /// Apply a partial update. Returns `false` if the user does not exist
    /// or the update is empty.
    async fn update_fields(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<bool, StoreError>;

    /// Atomically increment the failure counter, installing `lock_until`
    /// when the new count reaches `lock_after`. Concurrent calls must each
    /// count exactly once. Returns `None` if the user does not exist.
    async fn record_failure(
        &self,
        username: &str,
        lock_after: u32,
        lock_until: DateTime<Utc>,
    ) -> Result<Option<FailureState>, StoreError>;
}

/// Durable store of bearer sessions, keyed by token hash.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a session and return the raw token. `lifetime` is added to the
    /// creation instant to produce the absolute expiry.
    async fn create(&self, username: &str, lifetime: TimeDelta) -> Result<String, StoreError>;

    /// Look up by raw token. Expired records are deleted on read and
    /// reported as absent, indistinguishable from never having existed.
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Delete the session if present. Idempotent: unknown tokens are fine.
    async fn invalidate(&self, token: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_lock_update_shape() {
        let update = UserUpdate::clear_lock();
        assert_eq!(update.failed_attempts, Some(0));
        assert_eq!(update.locked_until, FieldUpdate::Clear);
        assert!(update.password_hash.is_none());
        assert!(update.role.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn default_update_is_empty() {
        assert!(UserUpdate::default().is_empty());
        let update = UserUpdate {
            role: Some(Role::Admin),
            ..UserUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn field_update_defaults_to_keep() {
        assert_eq!(FieldUpdate::<DateTime<Utc>>::default(), FieldUpdate::Keep);
    }

    #[test]
    fn failure_state_lock_flag() {
        let unlocked = FailureState {
            failed_attempts: 1,
            locked_until: None,
        };
        assert!(!unlocked.is_locked());
        let locked = FailureState {
            failed_attempts: 3,
            locked_until: Some(Utc::now()),
        };
        assert!(locked.is_locked());
    }
}
