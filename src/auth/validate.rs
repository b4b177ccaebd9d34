//! Username and password validation rules.
//!
//! The messages returned here are user-facing and surfaced verbatim by the
//! HTTP layer, so they stay specific about what failed.

use regex::Regex;

use super::error::AuthError;

/// Characters that satisfy the special-character password requirement.
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 50;

/// Character-set check for already length-validated usernames.
fn valid_username_charset(username: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_]+$").is_ok_and(|re| re.is_match(username))
}

/// Validate username format: 3-20 characters, letters, digits, underscores.
///
/// # Errors
/// Returns `AuthError::Validation` with a user-facing reason.
pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::Validation(
            "Username cannot be empty.".to_string(),
        ));
    }
    if username.len() < USERNAME_MIN {
        return Err(AuthError::Validation(
            "Username must be at least 3 characters long.".to_string(),
        ));
    }
    if username.len() > USERNAME_MAX {
        return Err(AuthError::Validation(
            "Username must be no more than 20 characters long.".to_string(),
        ));
    }
    if !valid_username_charset(username) {
        return Err(AuthError::Validation(
            "Username may only contain letters, numbers, and underscores (no spaces or symbols)."
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate password strength requirements: 8-50 characters with at least
/// one uppercase letter, one digit, and one special character.
///
/// # Errors
/// Returns `AuthError::Validation` with a user-facing reason.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }
    if password.len() < PASSWORD_MIN {
        return Err(AuthError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    if password.len() > PASSWORD_MAX {
        return Err(AuthError::Validation(
            "Password must be no more than 50 characters long".to_string(),
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(AuthError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::Validation(
            "Password must contain at least one number".to_string(),
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(AuthError::Validation(format!(
            "Password must contain at least one special character ({SPECIAL_CHARS})"
        )));
    }
    Ok(())
}

/// Advisory password strength rating; never gates registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score a password on length and character variety.
///
/// One point each for: length >= 8, length >= 12, lowercase, uppercase,
/// digit, special character. 0-2 is weak, 3-4 medium, 5-6 strong.
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    let mut score = 0;
    if password.len() >= 8 {
        score += 1;
    }
    if password.len() >= 12 {
        score += 1;
    }
    if password.chars().any(char::is_lowercase) {
        score += 1;
    }
    if password.chars().any(char::is_uppercase) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        score += 1;
    }

    match score {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<(), AuthError>) -> String {
        match result {
            Err(AuthError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn username_accepts_valid_forms() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_42").is_ok());
        assert!(validate_username("A_B").is_ok());
        assert!(validate_username(&"x".repeat(20)).is_ok());
    }

    #[test]
    fn username_rejects_empty_and_length() {
        assert!(reason(validate_username("")).contains("empty"));
        assert!(reason(validate_username("ab")).contains("at least 3"));
        assert!(reason(validate_username(&"x".repeat(21))).contains("no more than 20"));
    }

    #[test]
    fn username_rejects_bad_characters() {
        for name in ["has space", "dash-ed", "dot.ted", "emoji😀x"] {
            assert!(reason(validate_username(name)).contains("letters, numbers"));
        }
    }

    #[test]
    fn password_rejects_too_short() {
        assert!(reason(validate_password("short1!")).contains("at least 8"));
    }

    #[test]
    fn password_rejects_missing_special() {
        assert!(reason(validate_password("longenoughbutnospecial1A")).contains("special"));
    }

    #[test]
    fn password_rejects_missing_classes() {
        assert!(reason(validate_password("alllower1!x")).contains("uppercase"));
        assert!(reason(validate_password("NoDigits!!x")).contains("number"));
        assert!(reason(validate_password(&"A1!".repeat(20))).contains("no more than 50"));
        assert!(reason(validate_password("")).contains("empty"));
    }

    #[test]
    fn password_accepts_valid() {
        assert!(validate_password("Valid123!").is_ok());
        assert!(validate_password("Passw0rd!").is_ok());
    }

    #[test]
    fn strength_buckets() {
        assert_eq!(password_strength(""), PasswordStrength::Weak);
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        // length>=8 + lowercase + digit = 3
        assert_eq!(password_strength("abcdefg1"), PasswordStrength::Medium);
        // length>=8 + lower + upper + digit = 4
        assert_eq!(password_strength("Abcdefg1"), PasswordStrength::Medium);
        // all six criteria
        assert_eq!(password_strength("Abcdefghijk1!"), PasswordStrength::Strong);
    }

    #[test]
    fn strength_display_labels() {
        assert_eq!(PasswordStrength::Weak.to_string(), "Weak");
        assert_eq!(PasswordStrength::Medium.to_string(), "Medium");
        assert_eq!(PasswordStrength::Strong.to_string(), "Strong");
    }
}
