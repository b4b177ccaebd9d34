//! Login endpoint.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use super::error_response;
use super::session::session_cookie;
use super::types::{LoginRequest, LoginResponse};
use crate::auth::AuthService;

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid username or password", body = String),
        (status = 423, description = "Account locked", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    service: Extension<Arc<AuthService>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match service.login(&request.username, &request.password).await {
        Ok(grant) => {
            // The token travels both as the JSON body (for bearer clients)
            // and as an HttpOnly cookie (for the dashboard frontend).
            let mut headers = HeaderMap::new();
            match session_cookie(service.config(), &grant.token) {
                Ok(cookie) => {
                    headers.insert(SET_COOKIE, cookie);
                }
                Err(err) => error!("Failed to build session cookie: {err}"),
            }
            let response = LoginResponse {
                role: grant.role,
                token: grant.token,
            };
            (StatusCode::OK, headers, Json(response)).into_response()
        }
        Err(err) => {
            let (status, message) = error_response(&err);
            (status, message).into_response()
        }
    }
}
