//! OpenAPI document for the auth API.

use utoipa::OpenApi;

use super::handlers::auth::{authorize, login, register, session, types};
use super::handlers::health;
use crate::auth::rbac::{Action, Domain, Role};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        register::register,
        login::login,
        session::session,
        session::logout,
        authorize::authorize,
    ),
    components(schemas(
        health::Health,
        types::RegisterRequest,
        types::RegisterResponse,
        types::LoginRequest,
        types::LoginResponse,
        types::SessionResponse,
        types::AuthorizeResponse,
        Role,
        Domain,
        Action,
    )),
    tags(
        (name = "auth", description = "Authentication, sessions, and permissions"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "gardi",
        description = "Authentication and Session Security",
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
