//! Login flow coordinating the identity service with the local caches.

use std::sync::Arc;

use futures_util::Stream;
use stateflow::ResultState;

use crate::domain::flow::{FlowError, persist_token};
use crate::domain::ports::{AccountStore, AuthService, LoginReceipt, TokenStore};
use crate::domain::{Account, AuthToken, Credentials, Username};

/// Exchanges credentials for an authentication token and caches the result.
#[derive(Clone)]
pub struct Login {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<dyn TokenStore>,
}

impl Login {
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

    /// Runs one login attempt as a progressive result sequence.
    ///
    /// The stream is cold: nothing contacts the identity service until the
    /// caller polls. It yields `Loading` first and exactly one terminal
    /// state after it. Every call builds an independent sequence.
    pub fn execute(
        &self,
        credentials: Credentials,
    ) -> impl Stream<Item = ResultState<AuthToken, FlowError>> + Send + use<> {
        let auth = Arc::clone(&self.auth);
        let accounts = Arc::clone(&self.accounts);
        let tokens = Arc::clone(&self.tokens);
        stateflow::sequence(async move {
            Self::run(auth.as_ref(), accounts.as_ref(), tokens.as_ref(), credentials).await
        })
    }

    async fn run(
        auth: &dyn AuthService,
        accounts: &dyn AccountStore,
        tokens: &dyn TokenStore,
        credentials: Credentials,
    ) -> Result<AuthToken, FlowError> {
        let grant = match auth.login(&credentials).await? {
            LoginReceipt::Granted(grant) => grant,
            // Any upstream explanation is discarded; refused logins all
            // read the same to the caller.
            LoginReceipt::Rejected { .. } => return Err(FlowError::InvalidCredentials),
        };

        // Login replies carry no username, and an existing cached row wins
        // over this placeholder.
        let account = Account::new(grant.account_id, grant.email, Username::unknown());
        accounts.insert_or_ignore(&account).await?;

        // The account row must exist before the token row that references
        // it. The two writes are not wrapped in a transaction; a failure
        // between them leaves a cached account without a token.
        let token = AuthToken::new(grant.account_id, grant.token);
        persist_token(tokens, &token).await?;
        Ok(token)
    }
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
