//! Backend entry-point: loads configuration and launches the HTTP server.

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use wicket_backend::inbound::http::session_config::fingerprint::key_fingerprint;
use wicket_backend::inbound::http::session_config::{session_settings_from_env, BuildMode};
use wicket_backend::outbound::persistence::{DbPool, PoolConfig};
use wicket_backend::outbound::upstream::UpstreamSettings;
use wicket_backend::{create_server, HealthState, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let settings = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&settings.key),
        "session key loaded"
    );

    let upstream = UpstreamSettings::load().map_err(std::io::Error::other)?;
    if upstream.base_url().is_none() {
        warn!("no upstream base URL configured, serving fixture accounts");
    }

    let db_pool = match env::var("DATABASE_URL") {
        Ok(url) => Some(
            DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?,
        ),
        Err(_) => {
            warn!("DATABASE_URL not set, caching accounts and tokens in memory");
            None
        }
    };

    let mut config = ServerConfig::new(
        settings.key,
        settings.cookie_secure,
        settings.same_site,
        ([0, 0, 0, 0], 8080).into(),
    )
    .with_upstream(upstream);
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
