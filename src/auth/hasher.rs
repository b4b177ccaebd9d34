//! Password hashing on top of bcrypt.
//!
//! bcrypt embeds its cost factor and a fresh random salt in every hash, so
//! hashing the same password twice yields different strings and
//! verification needs nothing but the stored hash itself.

use bcrypt::BcryptError;

/// Hash a plaintext password with the given cost factor.
///
/// # Errors
/// Returns an error if the cost factor is outside bcrypt's supported range.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(plain, cost)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Malformed or truncated hashes verify as `false` instead of surfacing a
/// parse error, so callers cannot tell a corrupt record from a mismatch.
#[must_use]
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plain, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the test suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn same_password_hashes_differently() -> Result<(), BcryptError> {
        let first = hash_password("Passw0rd!", TEST_COST)?;
        let second = hash_password("Passw0rd!", TEST_COST)?;
        assert_ne!(first, second);
        assert!(verify_password("Passw0rd!", &first));
        assert!(verify_password("Passw0rd!", &second));
        Ok(())
    }

    #[test]
    fn wrong_password_fails_verification() -> Result<(), BcryptError> {
        let hash = hash_password("Passw0rd!", TEST_COST)?;
        assert!(!verify_password("Passw0rd?", &hash));
        assert!(!verify_password("", &hash));
        Ok(())
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("Passw0rd!", "not-a-bcrypt-hash"));
        assert!(!verify_password("Passw0rd!", ""));
    }

    #[test]
    fn invalid_cost_is_rejected() {
        assert!(hash_password("Passw0rd!", 2).is_err());
    }
}
