//! Outbound adapters: concrete implementations of the domain ports.
//!
//! `persistence` holds the PostgreSQL-backed account and token stores;
//! `upstream` holds the HTTP client for the legacy identity service. Both
//! only translate between domain types and wire or row representations;
//! the flows in `domain` own all the decisions.

pub mod persistence;
pub mod upstream;
