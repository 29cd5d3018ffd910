//! Driven port for the local authentication token cache.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{AccountId, AuthToken, TokenSecret};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token store adapters.
    pub enum TokenStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "token store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token store query failed: {message}",
    }
}

/// Port for the locally cached authentication tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert or refresh the token for its account.
    ///
    /// Returns the driver-reported row handle. A negative value means the
    /// driver rejected the write without raising an error; callers must
    /// treat it as a failed insert. `Err` is reserved for connection and
    /// query failures.
    async fn insert(&self, token: &AuthToken) -> Result<i64, TokenStoreError>;

    /// Fetch the cached token for an account.
    async fn find_by_account_id(&self, id: AccountId)
    -> Result<Option<AuthToken>, TokenStoreError>;

    /// Drop the cached token for an account, if any.
    async fn delete_by_account_id(&self, id: AccountId) -> Result<(), TokenStoreError>;
}

/// In-memory token store used until a database is configured.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<AccountId, TokenSecret>>,
    reject_writes: bool,
}

impl MemoryTokenStore {
    /// Create an empty store that accepts writes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose inserts report rejection with `-1`.
    ///
    /// Relational adapters surface hard failures as errors, so this is the
    /// only implementation that exercises the negative-handle contract.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            reject_writes: true,
        }
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<AccountId, TokenSecret>>, TokenStoreError> {
        self.tokens
            .lock()
            .map_err(|_| TokenStoreError::connection("token cache lock poisoned"))
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(&self, token: &AuthToken) -> Result<i64, TokenStoreError> {
        if self.reject_writes {
            return Ok(-1);
        }
        let mut tokens = self.guard()?;
        tokens.insert(token.account_id, token.secret.clone());
        Ok(1)
    }

    async fn find_by_account_id(
        &self,
        id: AccountId,
    ) -> Result<Option<AuthToken>, TokenStoreError> {
        let tokens = self.guard()?;
        Ok(tokens
            .get(&id)
            .map(|secret| AuthToken::new(id, secret.clone())))
    }

    async fn delete_by_account_id(&self, id: AccountId) -> Result<(), TokenStoreError> {
        let mut tokens = self.guard()?;
        tokens.remove(&id);
        Ok(())
    }
}
