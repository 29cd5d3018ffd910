//! Upstream identity service adapters.
//!
//! This module provides a thin HTTP implementation of the `AuthService`
//! port plus the configuration it is built from.

mod config;
mod dto;
mod http_service;

pub use config::UpstreamSettings;
pub use http_service::{HttpAuthService, UpstreamBuildError};
