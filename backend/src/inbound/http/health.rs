//! Liveness and readiness probes for orchestrators and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Shared probe flags.
///
/// A fresh state is alive but not yet accepting traffic. Bootstrap flips
/// readiness on once the listener is bound; shutdown hooks flip liveness
/// off so a draining process gets restarted promptly.
pub struct HealthState {
    accepting_traffic: AtomicBool,
    process_healthy: AtomicBool,
}

impl HealthState {
    /// Alive but not yet ready.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accepting_traffic: AtomicBool::new(false),
            process_healthy: AtomicBool::new(true),
        }
    }

    /// Start passing readiness probes.
    pub fn mark_ready(&self) {
        self.accepting_traffic.store(true, Ordering::Release);
    }

    /// Start failing liveness probes.
    pub fn mark_unhealthy(&self) {
        self.process_healthy.store(false, Ordering::Release);
    }

    /// Whether the readiness probe passes.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.accepting_traffic.load(Ordering::Acquire)
    }

    /// Whether the liveness probe passes.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.process_healthy.load(Ordering::Acquire)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe bodies are empty; the status carries the answer. `no-store` keeps
/// intermediaries from caching a stale verdict.
fn verdict(passing: bool) -> HttpResponse {
    let mut builder = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe. 200 once the listener is bound, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Still starting up")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    verdict(state.is_ready())
}

/// Liveness probe. 200 while healthy, 503 once the process is draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is healthy"),
        (status = 503, description = "Process is draining")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    verdict(state.is_alive())
}
