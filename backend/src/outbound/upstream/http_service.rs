//! Reqwest-backed identity service adapter.
//!
//! This adapter owns transport details only: form serialisation, timeout and
//! HTTP error mapping, and JSON decoding into typed receipts.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::config::UpstreamSettings;
use super::dto::{LoginResponseDto, RegisterResponseDto};
use crate::domain::ports::{AuthService, AuthServiceError, LoginReceipt, RegisterReceipt};
use crate::domain::{Credentials, Registration};

const DEFAULT_USER_AGENT: &str = "wicket-backend/0.1";

/// Errors that can occur while building the adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamBuildError {
    /// The configured base URL cannot produce endpoint URLs.
    #[error("invalid identity service base URL: {message}")]
    BaseUrl { message: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client { message: String },
}

impl UpstreamBuildError {
    /// Create a base URL error with the given message.
    pub fn base_url(message: impl Into<String>) -> Self {
        Self::BaseUrl {
            message: message.into(),
        }
    }

    /// Create a client error with the given message.
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }
}

/// Identity service adapter performing form-encoded POSTs against one base URL.
#[derive(Debug)]
pub struct HttpAuthService {
    client: Client,
    login_endpoint: Url,
    register_endpoint: Url,
}

impl HttpAuthService {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot produce the login and
    /// register endpoints or the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamBuildError> {
        let base =
            Url::parse(base_url).map_err(|error| UpstreamBuildError::base_url(error.to_string()))?;
        let login_endpoint = endpoint(&base, "login")?;
        let register_endpoint = endpoint(&base, "register")?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|error| UpstreamBuildError::client(error.to_string()))?;

        Ok(Self {
            client,
            login_endpoint,
            register_endpoint,
        })
    }

    /// Build an adapter from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings carry no base URL or the adapter
    /// cannot be constructed from them.
    pub fn from_settings(settings: &UpstreamSettings) -> Result<Self, UpstreamBuildError> {
        let base_url = settings
            .base_url()
            .ok_or_else(|| UpstreamBuildError::base_url("no base URL configured"))?;
        Self::new(base_url, settings.timeout())
    }

    async fn post_form<Dto>(
        &self,
        endpoint: Url,
        form: &[(&str, &str)],
    ) -> Result<Dto, AuthServiceError>
    where
        Dto: DeserializeOwned,
    {
        let response = self
            .client
            .post(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            AuthServiceError::decode(format!("invalid identity service JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReceipt, AuthServiceError> {
        let form = [
            ("email", credentials.email().as_str()),
            ("password", credentials.password()),
        ];
        let dto: LoginResponseDto = self.post_form(self.login_endpoint.clone(), &form).await?;
        dto.into_receipt().map_err(AuthServiceError::decode)
    }

    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisterReceipt, AuthServiceError> {
        let form = [
            ("email", registration.email().as_str()),
            ("username", registration.username().as_str()),
            ("password", registration.password()),
            ("password2", registration.password_confirmation()),
        ];
        let dto: RegisterResponseDto = self.post_form(self.register_endpoint.clone(), &form).await?;
        dto.into_receipt().map_err(AuthServiceError::decode)
    }
}

fn endpoint(base: &Url, segment: &str) -> Result<Url, UpstreamBuildError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| UpstreamBuildError::base_url("base URL cannot carry path segments"))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> AuthServiceError {
    if error.is_timeout() {
        AuthServiceError::timeout(error.to_string())
    } else {
        AuthServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthServiceError {
    let preview = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            let message = if preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {preview}", status.as_u16())
            };
            AuthServiceError::timeout(message)
        }
        _ => AuthServiceError::unexpected_status(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network identity service mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::trailing_slash("https://id.example.net/api/", "https://id.example.net/api/login")]
    #[case::no_trailing_slash("https://id.example.net/api", "https://id.example.net/api/login")]
    #[case::bare_host("https://id.example.net", "https://id.example.net/login")]
    fn endpoints_derive_from_the_base_url(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base URL");
        let endpoint = endpoint(&base, "login").expect("endpoint derives");
        assert_eq!(endpoint.as_str(), expected);
    }

    #[test]
    fn opaque_base_urls_are_refused() {
        let base = Url::parse("mailto:ops@example.net").expect("valid URL");
        let error = endpoint(&base, "login").expect_err("cannot-be-a-base must fail");
        assert!(matches!(error, UpstreamBuildError::BaseUrl { .. }));
    }

    #[test]
    fn settings_without_a_base_url_refuse_to_build() {
        let settings = UpstreamSettings {
            base_url: None,
            timeout_secs: 30,
        };
        let error = HttpAuthService::from_settings(&settings)
            .expect_err("missing base URL must fail");
        assert!(matches!(error, UpstreamBuildError::BaseUrl { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, "UnexpectedStatus")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "UnexpectedStatus")]
    #[case::not_found(StatusCode::NOT_FOUND, "UnexpectedStatus")]
    fn maps_http_statuses_to_expected_port_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"<html>upstream maintenance page</html>");
        match expected {
            "Timeout" => {
                assert!(
                    matches!(error, AuthServiceError::Timeout { .. }),
                    "timeout statuses should map to Timeout",
                );
            }
            "UnexpectedStatus" => {
                let AuthServiceError::UnexpectedStatus { status: code, .. } = error else {
                    panic!("other statuses should map to UnexpectedStatus, got {error:?}");
                };
                assert_eq!(code, status.as_u16());
            }
            _ => panic!("unsupported test expectation: {expected}"),
        }
    }

    #[test]
    fn body_previews_collapse_whitespace_and_truncate() {
        let long_body = format!("line one\nline   two {}", "x".repeat(300));
        let preview = body_preview(long_body.as_bytes());

        assert!(preview.starts_with("line one line two"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[test]
    fn empty_bodies_produce_empty_previews() {
        assert_eq!(body_preview(b""), String::new());
    }
}
