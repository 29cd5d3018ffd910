//! Runtime configuration handed to [`create_server`](super::create_server).

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::outbound::persistence::DbPool;
use crate::outbound::upstream::UpstreamSettings;

/// Everything the server needs to bind a listener and wire its adapters.
///
/// The mandatory pieces come through [`ServerConfig::new`]; the optional
/// outbound adapters are attached with the `with_*` builders. Anything left
/// unattached falls back to an in-memory or fixture implementation, which is
/// what the test suites run against.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) upstream: Option<UpstreamSettings>,
}

impl ServerConfig {
    /// Configuration with session settings and a bind address, no adapters.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            upstream: None,
        }
    }

    /// Use PostgreSQL-backed account and token stores instead of the
    /// in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Talk to a real upstream identity service instead of the fixture.
    ///
    /// Settings without a base URL still leave the fixture in place.
    #[must_use]
    pub fn with_upstream(mut self, upstream: UpstreamSettings) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
