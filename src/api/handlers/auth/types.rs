//! Request/response types for auth endpoints.
//!
//! Passwords arrive as `SecretString` so request debugging never prints
//! them; the schema still documents them as plain strings.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::rbac::Role;

#[derive(ToSchema, Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    /// Advisory strength rating; never a gate.
    pub strength: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub role: Role,
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub username: String,
    pub role: Role,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthorizeResponse {
    pub role: Role,
    pub domain: String,
    pub action: String,
    pub allowed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn login_request_deserializes_and_redacts() {
        let request: LoginRequest = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "password": "Passw0rd!",
        }))
        .unwrap_or_else(|err| panic!("request should deserialize: {err}"));
        assert_eq!(request.username, "alice");
        assert_eq!(request.password.expose_secret(), "Passw0rd!");
        // Debug output must not leak the password.
        let debug = format!("{request:?}");
        assert!(!debug.contains("Passw0rd!"));
    }

    #[test]
    fn login_response_round_trips() {
        let response = LoginResponse {
            role: Role::DatasetsAdmin,
            token: "token".to_string(),
        };
        let value = serde_json::to_value(&response)
            .unwrap_or_else(|err| panic!("response should serialize: {err}"));
        assert_eq!(
            value.get("role").and_then(serde_json::Value::as_str),
            Some("datasets_admin")
        );
        let decoded: LoginResponse = serde_json::from_value(value)
            .unwrap_or_else(|err| panic!("response should deserialize: {err}"));
        assert_eq!(decoded.token, "token");
    }
}
