//! Authentication configuration.
//!
//! All security-relevant settings travel in this explicit object, passed
//! into constructors rather than read from process-wide state.

use super::lockout::{DEFAULT_LOCK_COOLDOWN_SECONDS, DEFAULT_LOCK_THRESHOLD, LockoutPolicy};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_FRONTEND_BASE_URL: &str = "https://ops.permesi.dev";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_ttl_seconds: i64,
    lock_threshold: u32,
    lock_cooldown_seconds: i64,
    bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FRONTEND_BASE_URL.to_string())
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            lock_threshold: DEFAULT_LOCK_THRESHOLD,
            lock_cooldown_seconds: DEFAULT_LOCK_COOLDOWN_SECONDS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_lock_threshold(mut self, threshold: u32) -> Self {
        self.lock_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_lock_cooldown_seconds(mut self, seconds: i64) -> Self {
        self.lock_cooldown_seconds = seconds;
        self
    }

    /// Override the bcrypt cost factor, clamped to the supported 4..=31.
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost.clamp(4, 31);
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub const fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub const fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    #[must_use]
    pub const fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy::new(self.lock_threshold, self.lock_cooldown_seconds)
    }

    /// Session cookies are marked Secure only behind an HTTPS frontend.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}
