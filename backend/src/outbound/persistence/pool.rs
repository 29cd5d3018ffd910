//! Diesel connection pooling for the store adapters.
//!
//! The account and token stores share one bb8 pool of `diesel-async`
//! PostgreSQL connections. Checkout never blocks the runtime and gives up
//! after the configured deadline.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CHECKOUT_DEADLINE: Duration = Duration::from_secs(30);

define_port_error! {
    /// Failures raised while constructing the pool or leasing a connection.
    pub enum PoolError {
        /// The pool itself could not be constructed.
        Build { message: String } => "could not build connection pool: {message}",
        /// No connection became available before the checkout deadline.
        Checkout { message: String } => "could not lease pooled connection: {message}",
    }
}

/// Tunables for the shared database pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    checkout_deadline: Duration,
}

impl PoolConfig {
    /// Configuration pointing at `database_url` with default sizing.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            checkout_deadline: DEFAULT_CHECKOUT_DEADLINE,
        }
    }

    /// Cap the number of simultaneously open connections.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Bound how long a caller waits for a free connection.
    #[must_use]
    pub fn with_checkout_deadline(mut self, deadline: Duration) -> Self {
        self.checkout_deadline = deadline;
        self
    }

    /// The PostgreSQL connection string this pool will dial.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Shared handle over the bb8 pool. Cloning is cheap.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be constructed,
    /// for instance because the database URL does not parse.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.checkout_deadline)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::build(err.to_string()))
    }

    /// Lease a connection, waiting at most the configured deadline.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when no connection becomes available
    /// in time.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
