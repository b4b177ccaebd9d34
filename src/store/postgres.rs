//! PostgreSQL store adapters.
//!
//! Queries follow the service convention: every statement runs inside a
//! `db.query` span carrying the operation and statement text. Failure
//! counter updates are single statements so concurrent attempts cannot
//! interleave between read and write.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use tracing::Instrument;

use super::{
    FailureState, FieldUpdate, SessionRecord, SessionStore, UserRecord, UserStore, UserUpdate,
};
use crate::auth::error::StoreError;
use crate::auth::rbac::Role;
use crate::auth::token::{generate_session_token, hash_session_token};

const SCHEMA_SQL: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/db/sql/01_gardi.sql"
));

/// Create the users and sessions tables when they do not exist yet.
///
/// # Errors
/// Returns a `StoreError` when the DDL cannot be applied.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::Executor::execute(pool, SCHEMA_SQL)
        .await
        .context("failed to apply database schema")?;
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn map_user_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let role: String = row.get("role");
    let role = role
        .parse::<Role>()
        .map_err(|err| StoreError::new(format!("invalid role in user record: {err}")))?;
    let failed_attempts: i32 = row.get("failed_attempts");
    Ok(UserRecord {
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        role,
        failed_attempts: u32::try_from(failed_attempts).unwrap_or(0),
        locked_until: row.get("locked_until"),
        created_at: row.get("created_at"),
    })
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = r"
            SELECT username, password_hash, role, failed_attempts, locked_until, created_at
            FROM users
            WHERE username = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user")?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<bool, StoreError> {
        // Uniqueness is decided here, atomically, not by a prior read.
        let query = r"
            INSERT INTO users (username, password_hash, role, failed_attempts, locked_until)
            VALUES ($1, $2, $3, 0, NULL)
            ON CONFLICT (username) DO NOTHING
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(username)
            .bind(password_hash)
            .bind(role.as_str())
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert user")?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_fields(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<bool, StoreError> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut updates = builder.separated(", ");
            if let Some(hash) = update.password_hash {
                updates.push("password_hash = ");
                updates.push_bind_unseparated(hash);
            }
            if let Some(role) = update.role {
                updates.push("role = ");
                updates.push_bind_unseparated(role.as_str());
            }
            if let Some(count) = update.failed_attempts {
                updates.push("failed_attempts = ");
                updates.push_bind_unseparated(i32::try_from(count).unwrap_or(i32::MAX));
            }
            match update.locked_until {
                FieldUpdate::Keep => {}
                FieldUpdate::Set(until) => {
                    updates.push("locked_until = ");
                    updates.push_bind_unseparated(until);
                }
                FieldUpdate::Clear => {
                    updates.push("locked_until = NULL");
                }
            }
        }
        builder.push(" WHERE username = ");
        builder.push_bind(username);

        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE"
        );
        let result = builder
            .build()
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to update user")?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_failure(
        &self,
        username: &str,
        lock_after: u32,
        lock_until: DateTime<Utc>,
    ) -> Result<Option<FailureState>, StoreError> {
        // One statement: increment and conditional lock cannot interleave
        // with a concurrent attempt's read-modify-write.
        let query = r"
            UPDATE users
            SET failed_attempts = failed_attempts + 1,
                locked_until = CASE
                    WHEN failed_attempts + 1 >= $2 THEN $3
                    ELSE locked_until
                END
            WHERE username = $1
            RETURNING failed_attempts, locked_until
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .bind(i32::try_from(lock_after).unwrap_or(i32::MAX))
            .bind(lock_until)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to record login failure")?;

        Ok(row.map(|row| {
            let failed_attempts: i32 = row.get("failed_attempts");
            FailureState {
                failed_attempts: u32::try_from(failed_attempts).unwrap_or(0),
                locked_until: row.get("locked_until"),
            }
        }))
    }
}

#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, username: &str, lifetime: TimeDelta) -> Result<String, StoreError> {
        // Generate a random token, store only its hash, and return the raw
        // value to the caller. Collisions are vanishingly unlikely; retry a
        // couple of times if the key constraint ever fires.
        let query = r"
            INSERT INTO sessions (token_hash, username, created_at, expires_at)
            VALUES ($1, $2, NOW(), NOW() + ($3 * INTERVAL '1 second'))
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );

        for _ in 0..3 {
            let token = generate_session_token().map_err(StoreError::from)?;
            let token_hash = hash_session_token(&token);
            let result = sqlx::query(query)
                .bind(token_hash)
                .bind(username)
                .bind(lifetime.num_seconds())
                .execute(&self.pool)
                .instrument(span.clone())
                .await;

            match result {
                Ok(_) => return Ok(token),
                Err(err) if is_unique_violation(&err) => {}
                Err(err) => return Err(StoreError::from(
                    anyhow::Error::from(err).context("failed to insert session"),
                )),
            }
        }

        Err(StoreError::new("failed to generate unique session token"))
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        let token_hash = hash_session_token(token);
        let query = r"
            SELECT username, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&token_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup session")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record = SessionRecord {
            username: row.get("username"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        };

        // Lazy sweep: expired rows are removed on read, so a second lookup
        // of the same token finds nothing.
        if record.expires_at <= Utc::now() {
            let query = "DELETE FROM sessions WHERE token_hash = $1";
            let span = tracing::info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "DELETE",
                db.statement = query
            );
            sqlx::query(query)
                .bind(&token_hash)
                .execute(&self.pool)
                .instrument(span)
                .await
                .context("failed to delete expired session")?;
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn invalidate(&self, token: &str) -> Result<(), StoreError> {
        // Logout is idempotent; it's fine if no rows are deleted.
        let token_hash = hash_session_token(token);
        let query = "DELETE FROM sessions WHERE token_hash = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete session")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_both_tables() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS sessions"));
        assert!(SCHEMA_SQL.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn unique_violation_matches_sqlstate() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
