//! Registration flow coordinating the identity service with the local caches.

use std::sync::Arc;

use futures_util::Stream;
use stateflow::ResultState;

use crate::domain::flow::{FlowError, persist_token};
use crate::domain::ports::{AccountStore, AuthService, RegisterReceipt, TokenStore};
use crate::domain::{Account, AuthToken, Registration};

/// Shown when the identity service refuses a registration without saying why.
const REJECTION_FALLBACK: &str = "Registration failed.";

/// Creates an upstream account and caches the authoritative profile locally.
#[derive(Clone)]
pub struct Register {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<dyn TokenStore>,
}

impl Register {
    /// Builds the flow over its collaborating ports.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthService>,
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            auth,
            accounts,
            tokens,
        }
    }

    /// Runs one registration attempt as a progressive result sequence.
    ///
    /// The stream is cold and yields `Loading` followed by exactly one
    /// terminal state. Mismatched passwords end the sequence before any
    /// upstream call is made.
    pub fn execute(
        &self,
        registration: Registration,
    ) -> impl Stream<Item = ResultState<AuthToken, FlowError>> + Send + use<> {
        let auth = Arc::clone(&self.auth);
        let accounts = Arc::clone(&self.accounts);
        let tokens = Arc::clone(&self.tokens);
        stateflow::sequence(async move {
            Self::run(auth.as_ref(), accounts.as_ref(), tokens.as_ref(), registration).await
        })
    }

    async fn run(
        auth: &dyn AuthService,
        accounts: &dyn AccountStore,
        tokens: &dyn TokenStore,
        registration: Registration,
    ) -> Result<AuthToken, FlowError> {
        if !registration.passwords_match() {
            return Err(FlowError::PasswordMismatch);
        }

        let grant = match auth.register(&registration).await? {
            RegisterReceipt::Granted(grant) => grant,
            RegisterReceipt::Rejected { message } => {
                return Err(FlowError::RegistrationRejected {
                    message: message.unwrap_or_else(|| REJECTION_FALLBACK.to_owned()),
                });
            }
        };

        // Registration replies are authoritative, so the cached row is
        // replaced outright.
        let account = Account::new(grant.account_id, grant.email, grant.username);
        accounts.insert_and_replace(&account).await?;

        // Same ordering and transaction gap as the login flow: account row
        // first, token row second, no rollback between them.
        let token = AuthToken::new(grant.account_id, grant.token);
        persist_token(tokens, &token).await?;
        Ok(token)
    }
}

#[cfg(test)]
#[path = "register_tests.rs"]
mod tests;
