//! PostgreSQL store adapters.
//!
//! [`DieselAccountStore`] and [`DieselTokenStore`] implement the domain
//! store ports on top of `diesel-async` with a shared bb8 pool. The Diesel
//! row structs and the generated schema stay private to this module; the
//! rest of the crate only ever sees domain types, and every database
//! failure is mapped to the port's error type before it escapes.
//!
//! # Example
//!
//! ```ignore
//! use wicket_backend::outbound::persistence::{DbPool, DieselAccountStore, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/wicket");
//! let pool = DbPool::new(config).await?;
//! let accounts = DieselAccountStore::new(pool);
//! ```

mod account_store;
mod models;
mod pool;
mod schema;
mod token_store;

pub use account_store::DieselAccountStore;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use token_store::DieselTokenStore;
