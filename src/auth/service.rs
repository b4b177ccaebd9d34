//! Authentication service: registration, login, and session resolution.
//!
//! Login sequencing is the security contract here: the lock check runs
//! before any password material is touched, and counter mutations happen
//! atomically with the verification outcome inside the store.

use chrono::{TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, warn};

use super::config::AuthConfig;
use super::error::AuthError;
use super::lockout::{LockStatus, LockoutPolicy};
use super::rbac::{self, Action, Domain, Role};
use super::hasher;
use super::validate::{self, PasswordStrength};
use crate::store::{SessionRecord, SessionStore, UserStore, UserUpdate};

/// A successful login: the resolved role plus a fresh bearer token.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub role: Role,
    pub token: String,
}

/// The identity behind a valid session token.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub username: String,
    pub role: Role,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    lockout: LockoutPolicy,
    config: AuthConfig,
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            lockout: config.lockout_policy(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new account.
    ///
    /// # Errors
    /// `Validation` for malformed input, `UsernameTaken` on conflict,
    /// `Store` when persistence fails.
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<(), AuthError> {
        validate::validate_username(username)?;
        validate::validate_password(password.expose_secret())?;

        let password_hash = hasher::hash_password(password.expose_secret(), self.config.bcrypt_cost())
            .map_err(AuthError::Hashing)?;

        if self.users.insert(username, &password_hash, role).await? {
            debug!(username, role = %role, "user registered");
            Ok(())
        } else {
            Err(AuthError::UsernameTaken)
        }
    }

    /// Authenticate a user and mint a session.
    ///
    /// # Errors
    /// `UserNotFound`, `AccountLocked`, `WrongPassword` for the login
    /// outcomes; `Store` when persistence fails.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginGrant, AuthError> {
        let Some(user) = self.users.get_by_username(username).await? else {
            return Err(AuthError::UserNotFound);
        };

        let now = Utc::now();
        match self.lockout.status(user.locked_until, now) {
            LockStatus::Locked { until } => {
                // A locked account rejects even the correct password, and
                // the counter is left untouched.
                return Err(AuthError::AccountLocked {
                    retry_after_seconds: LockoutPolicy::remaining_seconds(until, now),
                });
            }
            LockStatus::Expired => {
                self.users
                    .update_fields(username, UserUpdate::clear_lock())
                    .await?;
            }
            LockStatus::Unlocked => {}
        }

        if !hasher::verify_password(password.expose_secret(), &user.password_hash) {
            let state = self
                .users
                .record_failure(username, self.lockout.threshold(), self.lockout.lock_until(now))
                .await?;
            if let Some(state) = state {
                if state.is_locked() {
                    warn!(
                        username,
                        failed_attempts = state.failed_attempts,
                        "account locked after repeated failures"
                    );
                }
            }
            return Err(AuthError::WrongPassword);
        }

        // Clear the counter before minting the session: if session creation
        // fails the login still fails cleanly, with the reset already done.
        self.users
            .update_fields(username, UserUpdate::clear_lock())
            .await?;

        let token = self
            .sessions
            .create(
                username,
                TimeDelta::seconds(self.config.session_ttl_seconds()),
            )
            .await?;

        debug!(username, role = %user.role, "login succeeded");
        Ok(LoginGrant {
            role: user.role,
            token,
        })
    }

    /// Resolve a bearer token to its session record, if still valid.
    ///
    /// # Errors
    /// `Store` when the lookup itself fails.
    pub async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.sessions.get(token).await?)
    }

    /// Resolve a bearer token all the way to a username and role.
    ///
    /// Sessions whose user record has disappeared resolve to `None`.
    ///
    /// # Errors
    /// `Store` when a lookup fails.
    pub async fn session_identity(
        &self,
        token: &str,
    ) -> Result<Option<SessionIdentity>, AuthError> {
        let Some(session) = self.sessions.get(token).await? else {
            return Ok(None);
        };
        let Some(user) = self.users.get_by_username(&session.username).await? else {
            return Ok(None);
        };
        Ok(Some(SessionIdentity {
            username: user.username,
            role: user.role,
        }))
    }

    /// Drop a session. Idempotent.
    ///
    /// # Errors
    /// `Store` when the delete fails.
    pub async fn invalidate_session(&self, token: &str) -> Result<(), AuthError> {
        Ok(self.sessions.invalidate(token).await?)
    }

    /// Whether the account is currently locked out. Expired locks are
    /// cleared as a side effect; unknown accounts report unlocked.
    ///
    /// # Errors
    /// `Store` when a lookup fails.
    pub async fn is_account_locked(&self, username: &str) -> Result<bool, AuthError> {
        let Some(user) = self.users.get_by_username(username).await? else {
            return Ok(false);
        };
        match self.lockout.status(user.locked_until, Utc::now()) {
            LockStatus::Locked { .. } => Ok(true),
            LockStatus::Expired => {
                self.users
                    .update_fields(username, UserUpdate::clear_lock())
                    .await?;
                Ok(false)
            }
            LockStatus::Unlocked => Ok(false),
        }
    }

    /// Pure RBAC decision; see [`rbac::check_permission`].
    #[must_use]
    pub fn check_permission(role: Role, domain: Domain, action: Action) -> bool {
        rbac::check_permission(role, domain, action)
    }

    /// Username format rules; see [`validate::validate_username`].
    ///
    /// # Errors
    /// `Validation` with a user-facing reason.
    pub fn validate_username(username: &str) -> Result<(), AuthError> {
        validate::validate_username(username)
    }

    /// Password strength rules; see [`validate::validate_password`].
    ///
    /// # Errors
    /// `Validation` with a user-facing reason.
    pub fn validate_password(password: &str) -> Result<(), AuthError> {
        validate::validate_password(password)
    }

    /// Advisory strength rating; see [`validate::password_strength`].
    #[must_use]
    pub fn password_strength(password: &str) -> PasswordStrength {
        validate::password_strength(password)
    }
}
