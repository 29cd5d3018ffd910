//! Builders selecting real or fixture ports from server configuration.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    AccountStore, AuthService, FixtureAuthService, MemoryAccountStore, MemoryTokenStore, TokenStore,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DieselAccountStore, DieselTokenStore};
use crate::outbound::upstream::HttpAuthService;

use super::ServerConfig;

/// Select the identity service adapter.
///
/// An upstream base URL selects the HTTP client; otherwise the fixture
/// service answers so local development needs no upstream at all.
fn build_auth_service(config: &ServerConfig) -> std::io::Result<Arc<dyn AuthService>> {
    let configured = config
        .upstream
        .as_ref()
        .filter(|settings| settings.base_url().is_some());
    match configured {
        Some(settings) => {
            let service = HttpAuthService::from_settings(settings).map_err(|err| {
                std::io::Error::other(format!("upstream client construction failed: {err}"))
            })?;
            Ok(Arc::new(service))
        }
        None => Ok(Arc::new(FixtureAuthService)),
    }
}

/// Select cache stores backed by the pool when one is available, otherwise
/// in-memory stores.
fn build_stores_with_pool<Pool>(
    pool: &Option<Pool>,
    make: impl FnOnce(&Pool) -> (Arc<dyn AccountStore>, Arc<dyn TokenStore>),
) -> (Arc<dyn AccountStore>, Arc<dyn TokenStore>) {
    match pool {
        Some(pool) => make(pool),
        None => (
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryTokenStore::new()),
        ),
    }
}

fn build_stores(config: &ServerConfig) -> (Arc<dyn AccountStore>, Arc<dyn TokenStore>) {
    build_stores_with_pool(&config.db_pool, |pool| {
        (
            Arc::new(DieselAccountStore::new(pool.clone())),
            Arc::new(DieselTokenStore::new(pool.clone())),
        )
    })
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let auth = build_auth_service(config)?;
    let (accounts, tokens) = build_stores(config);
    Ok(web::Data::new(HttpState::new(auth, accounts, tokens)))
}
