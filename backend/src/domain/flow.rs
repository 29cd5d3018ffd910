//! Shared failure taxonomy and plumbing for the authentication flows.
//!
//! Every step inside [`crate::domain::Login`] and [`crate::domain::Register`]
//! returns `Result<_, FlowError>`; the sequence boundary converts an `Err`
//! into the terminal error state. Port failures fold into
//! [`FlowError::Unexpected`] here so the use cases stay free of adapter
//! detail.

use tracing::warn;

use crate::domain::AuthToken;
use crate::domain::ports::{AccountStoreError, AuthServiceError, TokenStore, TokenStoreError};

/// Terminal failure reasons an authentication flow can end with.
///
/// The rendered messages are part of the client contract; they surface
/// verbatim in terminal error states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The identity service refused the login.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// The registration passwords disagree; nothing was sent upstream.
    #[error("Passwords must match")]
    PasswordMismatch,
    /// The identity service refused the registration.
    #[error("{message}")]
    RegistrationRejected {
        /// Upstream-provided explanation, or a fixed fallback.
        message: String,
    },
    /// The token store refused to persist the issued token.
    #[error("Error saving authentication token.")]
    TokenPersistenceFailure,
    /// Transport failures and anything else the flow cannot classify.
    #[error("{message}")]
    Unexpected {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<AuthServiceError> for FlowError {
    fn from(err: AuthServiceError) -> Self {
        Self::Unexpected {
            message: err.to_string(),
        }
    }
}

impl From<AccountStoreError> for FlowError {
    fn from(err: AccountStoreError) -> Self {
        Self::Unexpected {
            message: err.to_string(),
        }
    }
}

impl From<TokenStoreError> for FlowError {
    fn from(err: TokenStoreError) -> Self {
        Self::Unexpected {
            message: err.to_string(),
        }
    }
}

/// Insert the token and interpret the driver's result code.
///
/// A negative handle means the store rejected the write without raising an
/// error; both flows treat that as [`FlowError::TokenPersistenceFailure`].
pub(crate) async fn persist_token(
    tokens: &dyn TokenStore,
    token: &AuthToken,
) -> Result<(), FlowError> {
    let code = tokens.insert(token).await?;
    if code < 0 {
        warn!(account_id = %token.account_id, code, "token store rejected the write");
        return Err(FlowError::TokenPersistenceFailure);
    }
    Ok(())
}
