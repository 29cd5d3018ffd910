//! PostgreSQL-backed `TokenStore` implementation using Diesel ORM.
//!
//! This adapter keeps at most one token row per account. Inserts are
//! upserts keyed on the owning account, so a fresh login simply refreshes
//! the stored token.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{AccountId, AuthToken, TokenSecret};

use super::models::{AuthTokenRow, AuthTokenUpdate, NewAuthTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the `TokenStore` port.
#[derive(Clone)]
pub struct DieselTokenStore {
    pool: DbPool,
}

impl DieselTokenStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain token store errors.
fn map_pool_error(error: PoolError) -> TokenStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TokenStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain token store errors.
fn map_diesel_error(error: diesel::result::Error) -> TokenStoreError {
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
        DieselError::NotFound => TokenStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TokenStoreError::connection("database connection error")
        }
        _ => TokenStoreError::query("database error"),
    }
}

/// Convert a database row to a domain token.
fn row_to_token(row: AuthTokenRow) -> Result<AuthToken, TokenStoreError> {
    let secret = TokenSecret::parse(&row.token).map_err(|error| {
        TokenStoreError::query(format!(
            "token for account {} is invalid: {error}",
            row.account_id
        ))
    })?;
    Ok(AuthToken::new(AccountId::new(row.account_id), secret))
}

#[async_trait]
impl TokenStore for DieselTokenStore {
    async fn insert(&self, token: &AuthToken) -> Result<i64, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let row = NewAuthTokenRow {
            account_id: token.account_id.value(),
            token: token.secret.as_str(),
            issued_at: now,
        };
        let update = AuthTokenUpdate {
            token: token.secret.as_str(),
            issued_at: now,
        };

        let affected = diesel::insert_into(auth_tokens::table)
            .values(&row)
            .on_conflict(auth_tokens::account_id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Affected-row counts are non-negative, so this adapter signals
        // failure through Err alone.
        Ok(i64::try_from(affected).unwrap_or(i64::MAX))
    }

    async fn find_by_account_id(
        &self,
        id: AccountId,
    ) -> Result<Option<AuthToken>, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result: Option<AuthTokenRow> = auth_tokens::table
            .filter(auth_tokens::account_id.eq(id.value()))
            .select(AuthTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        result.map(row_to_token).transpose()
    }

    async fn delete_by_account_id(&self, id: AccountId) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(auth_tokens::table.filter(auth_tokens::account_id.eq(id.value())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
