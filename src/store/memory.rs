//! In-memory store adapters.
//!
//! Used by the test suite and suitable for single-process setups. Each
//! store serializes access through one mutex, which makes the lockout
//! counter update atomic the same way the SQL adapter's single UPDATE is.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{
    FailureState, FieldUpdate, SessionRecord, SessionStore, UserRecord, UserStore, UserUpdate,
};
use crate::auth::error::StoreError;
use crate::auth::rbac::Role;
use crate::auth::token::{generate_session_token, hash_session_token};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.get(username).cloned())
    }

    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<bool, StoreError> {
        let mut users = self.users.lock().await;
        if users.contains_key(username) {
            return Ok(false);
        }
        users.insert(
            username.to_string(),
            UserRecord {
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                role,
                failed_attempts: 0,
                locked_until: None,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn update_fields(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<bool, StoreError> {
        if update.is_empty() {
            return Ok(false);
        }
        let mut users = self.users.lock().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(false);
        };
        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(count) = update.failed_attempts {
            user.failed_attempts = count;
        }
        match update.locked_until {
            FieldUpdate::Keep => {}
            FieldUpdate::Set(until) => user.locked_until = Some(until),
            FieldUpdate::Clear => user.locked_until = None,
        }
        Ok(true)
    }

    async fn record_failure(
        &self,
        username: &str,
        lock_after: u32,
        lock_until: DateTime<Utc>,
    ) -> Result<Option<FailureState>, StoreError> {
        let mut users = self.users.lock().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(None);
        };
        user.failed_attempts = user.failed_attempts.saturating_add(1);
        if user.failed_attempts >= lock_after {
            user.locked_until = Some(lock_until);
        }
        Ok(Some(FailureState {
            failed_attempts: user.failed_attempts,
            locked_until: user.locked_until,
        }))
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    // Keyed by token hash, mirroring the SQL layout.
    sessions: Mutex<HashMap<Vec<u8>, SessionRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, username: &str, lifetime: TimeDelta) -> Result<String, StoreError> {
        let mut sessions = self.sessions.lock().await;
        for _ in 0..3 {
            let token = generate_session_token().map_err(StoreError::from)?;
            let token_hash = hash_session_token(&token);
            if sessions.contains_key(&token_hash) {
                continue;
            }
            let created_at = Utc::now();
            sessions.insert(
                token_hash,
                SessionRecord {
                    username: username.to_string(),
                    created_at,
                    expires_at: created_at + lifetime,
                },
            );
            return Ok(token);
        }
        Err(StoreError::new("failed to generate unique session token"))
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        let token_hash = hash_session_token(token);
        let mut sessions = self.sessions.lock().await;
        let Some(record) = sessions.get(&token_hash) else {
            return Ok(None);
        };
        if record.expires_at <= Utc::now() {
            sessions.remove(&token_hash);
            return Ok(None);
        }
        Ok(Some(record.clone()))
    }

    async fn invalidate(&self, token: &str) -> Result<(), StoreError> {
        let token_hash = hash_session_token(token);
        let mut sessions = self.sessions.lock().await;
        sessions.remove(&token_hash);
        Ok(())
    }
}
