//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary executes.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::auth;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        frontend_base_url: auth_opts.frontend_base_url,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        lock_threshold: auth_opts.lock_threshold,
        lock_cooldown_seconds: auth_opts.lock_cooldown_seconds,
        bcrypt_cost: auth_opts.bcrypt_cost,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_server_action_from_args() -> Result<()> {
        temp_env::with_vars([("GARDI_DSN", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec![
                "gardi",
                "--dsn",
                "postgres://user@localhost:5432/gardi",
                "--lock-threshold",
                "5",
                "--session-ttl-seconds",
                "3600",
            ]);
            let Action::Server(args) = handler(&matches)?;
            assert_eq!(args.port, 8080);
            assert_eq!(args.dsn, "postgres://user@localhost:5432/gardi");
            assert_eq!(args.lock_threshold, 5);
            assert_eq!(args.session_ttl_seconds, 3600);
            assert_eq!(args.lock_cooldown_seconds, 900);
            assert_eq!(args.bcrypt_cost, 12);
            Ok(())
        })
    }
}
