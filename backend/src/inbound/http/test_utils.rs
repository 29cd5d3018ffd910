//! Shared fixtures for HTTP-level tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

/// Cookie-session middleware for in-process test apps.
///
/// Uses a throwaway encryption key and plain-HTTP cookies, so each test app
/// gets sessions that look like production ones without needing TLS or a
/// configured key.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    let throwaway_key = Key::generate();
    SessionMiddleware::builder(CookieSessionStore::default(), throwaway_key)
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}
