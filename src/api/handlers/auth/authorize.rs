//! Per-request permission checks for the dashboard.
//!
//! The frontend asks whether the current session may perform an action in
//! a domain before rendering edit controls or accepting a mutation.

use axum::{
    Json,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use utoipa::IntoParams;

use super::session::extract_session_token;
use super::types::AuthorizeResponse;
use crate::auth::{Action, AuthService, Domain};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AuthorizeParams {
    /// Target domain: `datasets`, `cybersecurity`, or `it_tickets`.
    pub domain: String,
    /// Requested action: `view`, `create`, `edit`, or `delete`.
    pub action: String,
}

#[utoipa::path(
    get,
    path = "/v1/auth/authorize",
    params(AuthorizeParams),
    responses(
        (status = 200, description = "Permission decision", body = AuthorizeResponse),
        (status = 400, description = "Unknown domain or action", body = String),
        (status = 401, description = "No active session", body = String)
    ),
    tag = "auth"
)]
pub async fn authorize(
    headers: HeaderMap,
    service: Extension<Arc<AuthService>>,
    Query(params): Query<AuthorizeParams>,
) -> impl IntoResponse {
    let domain = match params.domain.parse::<Domain>() {
        Ok(domain) => domain,
        Err(err) => return (StatusCode::BAD_REQUEST, err).into_response(),
    };
    let action = match params.action.parse::<Action>() {
        Ok(action) => action,
        Err(err) => return (StatusCode::BAD_REQUEST, err).into_response(),
    };

    let Some(token) = extract_session_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, "No active session".to_string()).into_response();
    };

    match service.session_identity(&token).await {
        Ok(Some(identity)) => {
            let allowed = AuthService::check_permission(identity.role, domain, action);
            let response = AuthorizeResponse {
                role: identity.role,
                domain: domain.to_string(),
                action: action.to_string(),
                allowed,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (StatusCode::UNAUTHORIZED, "No active session".to_string()).into_response(),
        Err(err) => {
            error!("Failed to resolve session for authorize: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
