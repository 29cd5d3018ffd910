//! OpenAPI document for the gateway's HTTP surface.
//!
//! [`ApiDoc`] gathers every handler, the request and response payloads, the
//! shared [`Error`] envelope, and the session cookie security scheme into a
//! single generated specification. Debug builds serve it through Swagger UI
//! at `/docs`; `cargo run --bin openapi-dump` prints it for CI artefacts.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{
    AccountResponse, LoginRequest, RegisterRequest, SessionResponse,
};

/// Registers the session cookie under `SessionCookie` so protected
/// operations can reference it.
struct SessionCookieScheme;

impl Modify for SessionCookieScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let scheme = SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
            "session",
            "Session cookie issued by POST /api/v1/login or /api/v1/register.",
        )));
        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default)
            .add_security_scheme("SessionCookie", scheme);
    }
}

/// The generated OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieScheme),
    info(
        title = "Wicket backend API",
        description = "HTTP interface for account authentication flows and health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::current_account,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequest,
        RegisterRequest,
        SessionResponse,
        AccountResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "accounts", description = "Authentication and cached account access"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
