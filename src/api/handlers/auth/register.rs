//! Registration endpoint.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use secrecy::ExposeSecret;
use std::sync::Arc;

use super::error_response;
use super::types::{RegisterRequest, RegisterResponse};
use crate::auth::{AuthService, Role};

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Validation error", body = String),
        (status = 409, description = "Username already taken", body = String)
    ),
    tag = "auth"
)]
pub async fn register(
    service: Extension<Arc<AuthService>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    // Self-service registration always creates plain users; elevated roles
    // are granted afterwards through administrative tooling.
    match service
        .register(&request.username, &request.password, Role::User)
        .await
    {
        Ok(()) => {
            let strength = AuthService::password_strength(request.password.expose_secret());
            let response = RegisterResponse {
                message: format!("User '{}' registered", request.username),
                strength: strength.to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => {
            let (status, message) = error_response(&err);
            (status, message).into_response()
        }
    }
}
