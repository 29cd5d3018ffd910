//! Driven port for the upstream identity service.
//!
//! The upstream reports domain rejections inside successful replies, so the
//! port surfaces a typed receipt: either a grant carrying the issued token or
//! a rejection carrying the upstream's message. Transport-level failures are
//! errors; a rejection is not.

use async_trait::async_trait;

use crate::domain::{AccountId, Credentials, EmailAddress, Registration, TokenSecret, Username};

use super::define_port_error;

define_port_error! {
    /// Transport-level errors raised by identity service adapters.
    pub enum AuthServiceError {
        /// The upstream could not be reached.
        Transport { message: String } => "identity service unreachable: {message}",
        /// The upstream did not answer in time.
        Timeout { message: String } => "identity service timed out: {message}",
        /// The upstream answered with an unexpected HTTP status.
        UnexpectedStatus { status: u16, message: String } =>
            "identity service returned status {status}: {message}",
        /// The upstream reply could not be decoded.
        Decode { message: String } => "identity service reply malformed: {message}",
    }
}

/// Token grant returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Upstream-assigned account key.
    pub account_id: AccountId,
    /// Email the account authenticates with.
    pub email: EmailAddress,
    /// The issued bearer secret.
    pub token: TokenSecret,
}

/// Outcome of a login attempt the upstream actually answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReceipt {
    /// Credentials were accepted and a token issued.
    Granted(TokenGrant),
    /// Credentials were refused; the upstream may explain why.
    Rejected {
        /// Upstream-provided error text, when present.
        message: Option<String>,
    },
}

/// Token grant returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationGrant {
    /// Upstream-assigned account key.
    pub account_id: AccountId,
    /// Email the account registered with.
    pub email: EmailAddress,
    /// Username the upstream recorded.
    pub username: Username,
    /// The issued bearer secret.
    pub token: TokenSecret,
}

/// Outcome of a registration attempt the upstream actually answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterReceipt {
    /// The registration was accepted and a token issued.
    Granted(RegistrationGrant),
    /// The registration was refused; the upstream may explain why.
    Rejected {
        /// Upstream-provided error text, when present.
        message: Option<String>,
    },
}

/// Port for the remote identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a login receipt.
    async fn login(&self, credentials: &Credentials) -> Result<LoginReceipt, AuthServiceError>;

    /// Submit a registration and return its receipt.
    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisterReceipt, AuthServiceError>;
}

/// Email the fixture service treats as already registered.
pub const FIXTURE_EMAIL: &str = "demo@wicket.dev";

/// Password the fixture service accepts for [`FIXTURE_EMAIL`].
pub const FIXTURE_PASSWORD: &str = "password";

/// In-memory identity service used until an upstream is configured.
///
/// `demo@wicket.dev` / `password` logs in successfully with a fixed account
/// key and token. Registering that email is refused the way the upstream
/// refuses duplicates; any other registration is granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthService;

impl FixtureAuthService {
    fn fixture_token() -> Result<TokenSecret, AuthServiceError> {
        TokenSecret::parse("fixture-token")
            .map_err(|err| AuthServiceError::decode(format!("invalid fixture token: {err}")))
    }
}

#[async_trait]
impl AuthService for FixtureAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReceipt, AuthServiceError> {
        if credentials.email().as_str() == FIXTURE_EMAIL
            && credentials.password() == FIXTURE_PASSWORD
        {
            Ok(LoginReceipt::Granted(TokenGrant {
                account_id: AccountId::new(1),
                email: credentials.email().clone(),
                token: Self::fixture_token()?,
            }))
        } else {
            Ok(LoginReceipt::Rejected { message: None })
        }
    }

    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisterReceipt, AuthServiceError> {
        if registration.email().as_str() == FIXTURE_EMAIL {
            Ok(RegisterReceipt::Rejected {
                message: Some("That email is already in use.".to_owned()),
            })
        } else {
            Ok(RegisterReceipt::Granted(RegistrationGrant {
                account_id: AccountId::new(2),
                email: registration.email().clone(),
                username: registration.username().clone(),
                token: Self::fixture_token()?,
            }))
        }
    }
}
