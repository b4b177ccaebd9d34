//! End-to-end authentication flows over the in-memory stores.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use secrecy::SecretString;

use gardi::auth::{
    Action, AuthConfig, AuthError, AuthService, Domain, PasswordStrength, Role,
    password_strength, validate_password, validate_username,
};
use gardi::store::memory::{MemorySessionStore, MemoryUserStore};
use gardi::store::{FieldUpdate, SessionStore, UserStore, UserUpdate};

fn service() -> AuthService {
    let config = AuthConfig::new("http://localhost:3000".to_string())
        .with_bcrypt_cost(4)
        .with_lock_threshold(3)
        .with_lock_cooldown_seconds(900);
    AuthService::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemorySessionStore::new()),
        config,
    )
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

#[tokio::test]
async fn registration_conflict() -> Result<(), AuthError> {
    let service = service();
    service
        .register("alice", &secret("Passw0rd!"), Role::User)
        .await?;
    let result = service
        .register("alice", &secret("Other1$xx"), Role::User)
        .await;
    assert!(matches!(result, Err(AuthError::UsernameTaken)));
    Ok(())
}

#[tokio::test]
async fn lockout_after_three_wrong_passwords() -> Result<(), AuthError> {
    let service = service();
    service
        .register("alice", &secret("Passw0rd!"), Role::User)
        .await?;

    assert!(matches!(
        service.login("alice", &secret("wrongWrong1!")).await,
        Err(AuthError::WrongPassword)
    ));
    assert!(matches!(
        service.login("alice", &secret("wrongWrong1!")).await,
        Err(AuthError::WrongPassword)
    ));
    assert!(matches!(
        service.login("alice", &secret("wrongWrong1!")).await,
        Err(AuthError::WrongPassword)
    ));

    // Locked now: even the correct password is rejected.
    assert!(service.is_account_locked("alice").await?);
    assert!(matches!(
        service.login("alice", &secret("Passw0rd!")).await,
        Err(AuthError::AccountLocked { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn login_resolves_role_and_mints_token() -> Result<(), AuthError> {
    let service = service();
    service
        .register("dana", &secret("Passw0rd!"), Role::CybersecurityAdmin)
        .await?;
    let grant = service.login("dana", &secret("Passw0rd!")).await?;
    assert_eq!(grant.role, Role::CybersecurityAdmin);

    let session = service.get_session(&grant.token).await?;
    assert!(session.as_ref().is_some_and(|s| s.username == "dana"));
    // Absolute expiry: created_at + lifetime, not sliding.
    assert!(session.is_some_and(|s| s.expires_at - s.created_at == TimeDelta::seconds(86_400)));

    let identity = service.session_identity(&grant.token).await?;
    assert!(identity.is_some_and(|i| i.role == Role::CybersecurityAdmin));
    Ok(())
}

#[tokio::test]
async fn logout_then_session_gone() -> Result<(), AuthError> {
    let service = service();
    service
        .register("alice", &secret("Passw0rd!"), Role::User)
        .await?;
    let grant = service.login("alice", &secret("Passw0rd!")).await?;
    assert!(service.get_session(&grant.token).await?.is_some());

    service.invalidate_session(&grant.token).await?;
    assert!(service.get_session(&grant.token).await?.is_none());
    // Idempotent: a second logout of the same token is a no-op.
    service.invalidate_session(&grant.token).await?;
    Ok(())
}

#[tokio::test]
async fn expired_session_is_deleted_on_read() -> Result<(), AuthError> {
    let sessions = Arc::new(MemorySessionStore::new());
    let token = sessions.create("alice", TimeDelta::zero()).await?;
    assert!(sessions.get(&token).await?.is_none());
    assert!(sessions.get(&token).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn concurrent_wrong_passwords_each_count() -> Result<(), AuthError> {
    let users = Arc::new(MemoryUserStore::new());
    let config = AuthConfig::new("http://localhost:3000".to_string())
        .with_bcrypt_cost(4)
        .with_lock_threshold(3);
    let service = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(MemorySessionStore::new()),
        config,
    ));
    service
        .register("alice", &secret("Passw0rd!"), Role::User)
        .await?;

    let attempts: Vec<_> = (0..3)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.login("alice", &secret("wrongWrong1!")).await })
        })
        .collect();
    for attempt in attempts {
        let outcome = attempt.await.expect("login task panicked");
        assert!(matches!(
            outcome,
            Err(AuthError::WrongPassword | AuthError::AccountLocked { .. })
        ));
    }

    // No under-counting: all three failures landed.
    let user = users.get_by_username("alice").await?;
    assert!(user.is_some_and(|u| u.failed_attempts == 3));
    assert!(service.is_account_locked("alice").await?);
    Ok(())
}

#[tokio::test]
async fn lock_expiry_allows_login_again() -> Result<(), AuthError> {
    let users = Arc::new(MemoryUserStore::new());
    let config = AuthConfig::new("http://localhost:3000".to_string())
        .with_bcrypt_cost(4)
        .with_lock_threshold(3);
    let service = AuthService::new(
        users.clone(),
        Arc::new(MemorySessionStore::new()),
        config,
    );
    service
        .register("alice", &secret("Passw0rd!"), Role::User)
        .await?;
    for _ in 0..3 {
        let _ = service.login("alice", &secret("wrongWrong1!")).await;
    }
    assert!(service.is_account_locked("alice").await?);

    // Rewind the lock so the window has already passed.
    let update = UserUpdate {
        locked_until: FieldUpdate::Set(Utc::now() - TimeDelta::seconds(1)),
        ..UserUpdate::default()
    };
    users.update_fields("alice", update).await?;

    assert!(!service.is_account_locked("alice").await?);
    let grant = service.login("alice", &secret("Passw0rd!")).await?;
    assert_eq!(grant.role, Role::User);
    let user = users.get_by_username("alice").await?;
    assert!(user.is_some_and(|u| u.failed_attempts == 0 && u.locked_until.is_none()));
    Ok(())
}

#[test]
fn validation_scenarios() {
    assert!(validate_password("short1!").is_err());
    assert!(validate_password("longenoughbutnospecial1A").is_err());
    assert!(validate_password("Valid123!").is_ok());

    assert!(validate_username("alice").is_ok());
    assert!(validate_username("no spaces").is_err());

    assert_eq!(password_strength("abc"), PasswordStrength::Weak);
    assert_eq!(password_strength("Valid123!"), PasswordStrength::Strong);
}

#[test]
fn rbac_matrix_spot_checks() {
    assert!(AuthService::check_permission(
        Role::Admin,
        Domain::ItTickets,
        Action::Delete
    ));
    assert!(!AuthService::check_permission(
        Role::User,
        Domain::Datasets,
        Action::Edit
    ));
    assert!(AuthService::check_permission(
        Role::DatasetsAdmin,
        Domain::Cybersecurity,
        Action::View
    ));
    assert!(!AuthService::check_permission(
        Role::DatasetsAdmin,
        Domain::Cybersecurity,
        Action::Edit
    ));
}
