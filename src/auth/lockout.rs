//! Account lockout policy driven by persisted failure counters.
//!
//! Lock state lives entirely in the user record (`failed_attempts`,
//! `locked_until`), never in process memory, so it survives restarts and is
//! shared by every instance pointed at the same store. Expired locks are
//! cleared lazily on the next attempt instead of by a background sweeper.

use chrono::{DateTime, TimeDelta, Utc};

pub const DEFAULT_LOCK_THRESHOLD: u32 = 3;
pub const DEFAULT_LOCK_COOLDOWN_SECONDS: i64 = 15 * 60;

/// Lock state derived from a user record at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// No lock recorded; attempts proceed to password verification.
    Unlocked,
    /// Lock window still open; the attempt is rejected before any
    /// password material is touched.
    Locked { until: DateTime<Utc> },
    /// Lock window has passed; the caller clears counters and proceeds
    /// with the same attempt.
    Expired,
}

/// Threshold and cooldown settings for consecutive login failures.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    threshold: u32,
    cooldown_seconds: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOCK_THRESHOLD,
            cooldown_seconds: DEFAULT_LOCK_COOLDOWN_SECONDS,
        }
    }
}

impl LockoutPolicy {
    #[must_use]
    pub const fn new(threshold: u32, cooldown_seconds: i64) -> Self {
        Self {
            threshold,
            cooldown_seconds,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub const fn cooldown_seconds(&self) -> i64 {
        self.cooldown_seconds
    }

    /// Derive the lock state from a stored `locked_until` value.
    #[must_use]
    pub fn status(&self, locked_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> LockStatus {
        match locked_until {
            None => LockStatus::Unlocked,
            Some(until) if now < until => LockStatus::Locked { until },
            Some(_) => LockStatus::Expired,
        }
    }

    /// Whether an incremented failure counter reaches the lock threshold.
    #[must_use]
    pub const fn locks_at(&self, failed_attempts: u32) -> bool {
        failed_attempts >= self.threshold
    }

    /// The instant a lock placed now would expire.
    #[must_use]
    pub fn lock_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + TimeDelta::seconds(self.cooldown_seconds)
    }

    /// Seconds left on an active lock, saturating at zero.
    #[must_use]
    pub fn remaining_seconds(until: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        u64::try_from((until - now).num_seconds()).unwrap_or(0)
    }
}
