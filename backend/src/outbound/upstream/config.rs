//! Identity service configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Configuration values for reaching the upstream identity service.
///
/// When no base URL is configured the server falls back to the fixture
/// service, so local development needs no upstream at all.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "UPSTREAM_AUTH")]
pub struct UpstreamSettings {
    /// Base URL of the identity service, e.g. `https://id.example.net/api/`.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[ortho_config(default = 30)]
    pub timeout_secs: u64,
}

impl UpstreamSettings {
    /// Return the configured base URL, when one is set.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Return the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for identity service configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> UpstreamSettings {
        UpstreamSettings::load_from_iter([OsString::from("wicket-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("UPSTREAM_AUTH_BASE_URL", None::<String>),
            ("UPSTREAM_AUTH_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.base_url().is_none());
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "UPSTREAM_AUTH_BASE_URL",
                Some("https://id.example.net/api/".to_owned()),
            ),
            ("UPSTREAM_AUTH_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.base_url(), Some("https://id.example.net/api/"));
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }
}
