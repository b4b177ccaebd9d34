//! # Gardi (Authentication and Session Security)
//!
//! `gardi` is the authentication authority for the multi-domain operations
//! dashboard (Datasets, Cybersecurity, IT Tickets). It owns password
//! handling, account lockout, server-side bearer sessions, and role-based
//! access control; the dashboard's data layers consume its decisions.
//!
//! ## Lockout
//!
//! Accounts lock after 3 consecutive failed logins (configurable) for a
//! 15-minute cooldown. Lock state is persisted with the user record, so it
//! survives restarts and is shared across instances on the same database.
//! While locked, attempts are rejected before any password verification.
//!
//! ## Sessions
//!
//! Login mints a 256-bit URL-safe bearer token with an absolute expiry.
//! Only a SHA-256 hash of the token is stored; expired rows are deleted
//! lazily on lookup rather than by a background sweeper.
//!
//! ## Authorization
//!
//! Permissions derive from a fixed role enumeration: platform admins may do
//! anything, plain users may only view, and each domain admin has full
//! access to its own domain plus view access elsewhere.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
