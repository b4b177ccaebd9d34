//! Authentication and session security core.
//!
//! This module owns credential hashing, input validation, the lockout
//! state machine, session issuance, and RBAC decisions. Persistence is
//! abstracted behind the [`crate::store`] traits; everything here works
//! the same against PostgreSQL or the in-memory adapters.

pub mod config;
pub mod error;
pub mod hasher;
pub mod lockout;
pub mod rbac;
pub mod service;
pub mod token;
pub mod validate;

pub use config::AuthConfig;
pub use error::{AuthError, StoreError};
pub use lockout::{LockStatus, LockoutPolicy};
pub use rbac::{Action, Domain, Role, check_permission};
pub use service::{AuthService, LoginGrant, SessionIdentity};
pub use validate::{PasswordStrength, password_strength, validate_password, validate_username};
