//! Domain primitives and the authentication flows built on them.
//!
//! Purpose: Define strongly typed domain entities, the ports the flows
//! depend on, and the login and registration use cases themselves. Keep
//! types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Account (alias to `account::Account`) — cached account profile.
//! - AccountId (alias to `account::AccountId`) — upstream account key.
//! - AuthToken (alias to `token::AuthToken`) — cached authentication token.
//! - Credentials (alias to `auth::Credentials`) — validated login input.
//! - EmailAddress (alias to `account::EmailAddress`) — validated email.
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - FlowError (alias to `flow::FlowError`) — terminal flow failures.
//! - Login (alias to `login::Login`) — credential exchange flow.
//! - Register (alias to `register::Register`) — account creation flow.
//! - Registration (alias to `auth::Registration`) — validated sign-up input.
//! - TokenSecret (alias to `token::TokenSecret`) — opaque token value.
//! - TraceId (alias to `trace_id::TraceId`) — request correlation id.
//! - Username (alias to `account::Username`) — display name, possibly unknown.

pub mod account;
pub mod auth;
pub mod error;
pub mod flow;
pub mod login;
pub mod ports;
pub mod register;
pub mod token;
pub mod trace_id;

pub use self::account::{
    Account, AccountId, EmailAddress, EmailValidationError, USERNAME_MAX, Username,
    UsernameValidationError,
};
pub use self::auth::{
    Credentials, CredentialsValidationError, Registration, RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode};
pub use self::flow::FlowError;
pub use self::login::Login;
pub use self::register::Register;
pub use self::token::{AuthToken, TokenSecret, TokenValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
