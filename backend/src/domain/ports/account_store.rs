//! Driven port for the local account cache.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Account, AccountId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account store adapters.
    pub enum AccountStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "account store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account store query failed: {message}",
    }
}

/// Port for the locally cached account records.
///
/// The two insert flavours encode who owns the data: login responses are a
/// partial view, so they must not disturb an existing row; registration
/// responses are authoritative, so they overwrite.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert the account unless a row for its key already exists.
    async fn insert_or_ignore(&self, account: &Account) -> Result<(), AccountStoreError>;

    /// Insert the account, replacing any existing row for its key.
    async fn insert_and_replace(&self, account: &Account) -> Result<(), AccountStoreError>;

    /// Fetch a cached account by key.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError>;
}

/// In-memory account store used until a database is configured.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<AccountId, Account>>, AccountStoreError> {
        self.accounts
            .lock()
            .map_err(|_| AccountStoreError::connection("account cache lock poisoned"))
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert_or_ignore(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.guard()?;
        accounts.entry(account.id).or_insert_with(|| account.clone());
        Ok(())
    }

    async fn insert_and_replace(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut accounts = self.guard()?;
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.guard()?;
        Ok(accounts.get(&id).cloned())
    }
}
