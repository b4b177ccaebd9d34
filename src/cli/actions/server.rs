use crate::{api, auth::AuthConfig};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_base_url: String,
    pub session_ttl_seconds: i64,
    pub lock_threshold: u32,
    pub lock_cooldown_seconds: i64,
    pub bcrypt_cost: u32,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new(args.frontend_base_url)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_lock_threshold(args.lock_threshold)
        .with_lock_cooldown_seconds(args.lock_cooldown_seconds)
        .with_bcrypt_cost(args.bcrypt_cost);

    api::new(args.port, args.dsn, auth_config).await
}
