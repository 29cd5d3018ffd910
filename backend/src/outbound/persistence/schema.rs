//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Cached account profiles.
    ///
    /// Mirrors the upstream identity service's view of an account. The `id`
    /// column is the upstream primary key, not a locally generated value.
    accounts (id) {
        /// Upstream primary key.
        id -> BigInt,
        /// Account email as reported by the upstream.
        email -> Varchar,
        /// Display name; empty until a registration reply provides one.
        username -> Varchar,
        /// Timestamp of the last write that touched this row.
        refreshed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cached authentication tokens, one per account.
    ///
    /// Rows reference `accounts` and are written strictly after the account
    /// row they belong to.
    auth_tokens (account_id) {
        /// Upstream primary key of the owning account.
        account_id -> BigInt,
        /// Opaque token issued by the upstream.
        token -> Varchar,
        /// Timestamp of the last token refresh.
        issued_at -> Timestamptz,
    }
}
