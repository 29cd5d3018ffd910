//! PostgreSQL-backed `AccountStore` implementation using Diesel ORM.
//!
//! This adapter caches the upstream identity service's view of an account.
//! The two insert flavours map onto `ON CONFLICT DO NOTHING` and
//! `ON CONFLICT DO UPDATE` against the upstream primary key.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{AccountStore, AccountStoreError};
use crate::domain::{Account, AccountId, EmailAddress, Username};

use super::models::{AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountStore` port.
#[derive(Clone)]
pub struct DieselAccountStore {
    pool: DbPool,
}

impl DieselAccountStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain account store errors.
fn map_pool_error(error: PoolError) -> AccountStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain account store errors.
fn map_diesel_error(error: diesel::result::Error) -> AccountStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => AccountStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountStoreError::connection("database connection error")
        }
        _ => AccountStoreError::query("database error"),
    }
}

/// Convert a database row to a domain account.
fn row_to_account(row: AccountRow) -> Result<Account, AccountStoreError> {
    let email = EmailAddress::parse(&row.email).map_err(|error| {
        AccountStoreError::query(format!("account {} has invalid email: {error}", row.id))
    })?;
    let username = Username::parse(&row.username).map_err(|error| {
        AccountStoreError::query(format!("account {} has invalid username: {error}", row.id))
    })?;
    Ok(Account::new(AccountId::new(row.id), email, username))
}

#[async_trait]
impl AccountStore for DieselAccountStore {
    async fn insert_or_ignore(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccountRow {
            id: account.id.value(),
            email: account.email.as_str(),
            username: account.username.as_str(),
            refreshed_at: Utc::now(),
        };

        diesel::insert_into(accounts::table)
            .values(&row)
            .on_conflict(accounts::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn insert_and_replace(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let row = NewAccountRow {
            id: account.id.value(),
            email: account.email.as_str(),
            username: account.username.as_str(),
            refreshed_at: now,
        };
        let update = AccountUpdate {
            email: account.email.as_str(),
            username: account.username.as_str(),
            refreshed_at: now,
        };

        diesel::insert_into(accounts::table)
            .values(&row)
            .on_conflict(accounts::id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result: Option<AccountRow> = accounts::table
            .filter(accounts::id.eq(id.value()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        result.map(row_to_account).transpose()
    }
}
