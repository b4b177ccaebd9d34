//! Auth-related CLI arguments: session TTL, lockout tuning, cookie origin.

use clap::{Arg, Command};

pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_LOCK_THRESHOLD: &str = "lock-threshold";
pub const ARG_LOCK_COOLDOWN_SECONDS: &str = "lock-cooldown-seconds";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Dashboard origin allowed by CORS and used for cookie flags")
                .env("GARDI_FRONTEND_BASE_URL")
                .default_value("https://ops.permesi.dev"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds")
                .env("GARDI_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_LOCK_THRESHOLD)
                .long(ARG_LOCK_THRESHOLD)
                .help("Consecutive failed logins before an account locks")
                .env("GARDI_LOCK_THRESHOLD")
                .default_value("3")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_LOCK_COOLDOWN_SECONDS)
                .long(ARG_LOCK_COOLDOWN_SECONDS)
                .help("How long a locked account stays locked, in seconds")
                .env("GARDI_LOCK_COOLDOWN_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt cost factor (4-31)")
                .env("GARDI_BCRYPT_COST")
                .default_value("12")
                .value_parser(clap::value_parser!(u32)),
        )
}

/// Parsed auth options.
#[derive(Debug)]
pub struct Options {
    pub frontend_base_url: String,
    pub session_ttl_seconds: i64,
    pub lock_threshold: u32,
    pub lock_cooldown_seconds: i64,
    pub bcrypt_cost: u32,
}

impl Options {
    /// Extract the auth options from parsed matches.
    ///
    /// # Errors
    /// Returns an error when a defaulted argument is somehow absent.
    pub fn parse(matches: &clap::ArgMatches) -> anyhow::Result<Self> {
        use anyhow::Context;

        Ok(Self {
            frontend_base_url: matches
                .get_one::<String>(ARG_FRONTEND_BASE_URL)
                .cloned()
                .context("missing required argument: --frontend-base-url")?,
            session_ttl_seconds: matches
                .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
                .copied()
                .context("missing required argument: --session-ttl-seconds")?,
            lock_threshold: matches
                .get_one::<u32>(ARG_LOCK_THRESHOLD)
                .copied()
                .context("missing required argument: --lock-threshold")?,
            lock_cooldown_seconds: matches
                .get_one::<i64>(ARG_LOCK_COOLDOWN_SECONDS)
                .copied()
                .context("missing required argument: --lock-cooldown-seconds")?,
            bcrypt_cost: matches
                .get_one::<u32>(ARG_BCRYPT_COST)
                .copied()
                .context("missing required argument: --bcrypt-cost")?,
        })
    }
}
