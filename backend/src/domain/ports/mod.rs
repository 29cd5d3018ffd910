//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_store;
mod auth_service;
mod token_store;

#[cfg(test)]
pub use account_store::MockAccountStore;
pub use account_store::{AccountStore, AccountStoreError, MemoryAccountStore};
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{
    AuthService, AuthServiceError, FIXTURE_EMAIL, FIXTURE_PASSWORD, FixtureAuthService,
    LoginReceipt, RegisterReceipt, RegistrationGrant, TokenGrant,
};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{MemoryTokenStore, TokenStore, TokenStoreError};
