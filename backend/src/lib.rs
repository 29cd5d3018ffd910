//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;


/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Correlation identifier threaded through logs and error payloads.
pub use domain::TraceId;
/// Readiness and liveness state shared with the HTTP probes.
pub use inbound::http::health::HealthState;
/// Request tracing middleware.
pub use middleware::Trace;
pub use server::{create_server, ServerConfig};
