//! Auth endpoints: registration, login, logout, session, authorization.
//!
//! ## Lockout
//!
//! Three consecutive wrong-password attempts lock an account for 15
//! minutes (both configurable). While locked, login attempts answer
//! `423 Locked` without touching the stored credentials.
//!
//! ## Enumeration
//!
//! Unknown usernames and wrong passwords are reported with the same
//! `401` body. The distinction exists in the core error type but is
//! deliberately not exposed over HTTP.

pub(crate) mod authorize;
pub(crate) mod login;
pub(crate) mod register;
pub(crate) mod session;
pub(crate) mod types;

use axum::http::StatusCode;
use tracing::error;

use crate::auth::AuthError;

/// Map a core error to an HTTP status and user-facing body.
pub(super) fn error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::UsernameTaken => (StatusCode::CONFLICT, "Username already taken".to_string()),
        AuthError::UserNotFound | AuthError::WrongPassword => (
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ),
        AuthError::AccountLocked { .. } => (StatusCode::LOCKED, err.to_string()),
        AuthError::Hashing(_) | AuthError::Store(_) => {
            error!("auth operation failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StoreError;

    #[test]
    fn login_outcomes_are_indistinguishable_over_http() {
        let not_found = error_response(&AuthError::UserNotFound);
        let wrong = error_response(&AuthError::WrongPassword);
        assert_eq!(not_found, wrong);
        assert_eq!(not_found.0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn status_mapping() {
        let (status, body) =
            error_response(&AuthError::Validation("Password cannot be empty".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Password cannot be empty");

        let (status, _) = error_response(&AuthError::UsernameTaken);
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = error_response(&AuthError::AccountLocked {
            retry_after_seconds: 60,
        });
        assert_eq!(status, StatusCode::LOCKED);
        assert!(body.contains("60"));

        let (status, body) = error_response(&AuthError::Store(StoreError::new("down")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // Store details stay in the logs, not the response body.
        assert!(!body.contains("down"));
    }
}
