//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{accounts, auth_tokens};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[expect(dead_code, reason = "schema field for cache expiry support")]
    pub refreshed_at: DateTime<Utc>,
}

/// Insertable struct for writing account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: i64,
    pub email: &'a str,
    pub username: &'a str,
    pub refreshed_at: DateTime<Utc>,
}

/// Changeset struct for replacing an existing account record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
pub(crate) struct AccountUpdate<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub refreshed_at: DateTime<Utc>,
}

/// Row struct for reading from the auth_tokens table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthTokenRow {
    pub account_id: i64,
    pub token: String,
    #[expect(dead_code, reason = "schema field for cache expiry support")]
    pub issued_at: DateTime<Utc>,
}

/// Insertable struct for writing token records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub account_id: i64,
    pub token: &'a str,
    pub issued_at: DateTime<Utc>,
}

/// Changeset struct for refreshing an existing token record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct AuthTokenUpdate<'a> {
    pub token: &'a str,
    pub issued_at: DateTime<Utc>,
}
