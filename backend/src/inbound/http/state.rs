//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain flows and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountStore, AuthService, TokenStore};
use crate::domain::{Login, Register};

/// Dependency bundle for HTTP handlers.
///
/// The flows own the orchestration; the stores are also exposed directly so
/// read-only endpoints can serve cached rows without going through a flow.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<Login>,
    pub register: Arc<Register>,
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<dyn TokenStore>,
}

impl HttpState {
    /// Construct state from the shared ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use wicket_backend::domain::ports::{
    ///     FixtureAuthService, MemoryAccountStore, MemoryTokenStore,
    /// };
    /// use wicket_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureAuthService),
    ///     Arc::new(MemoryAccountStore::new()),
    ///     Arc::new(MemoryTokenStore::new()),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        auth: Arc<dyn AuthService>,
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let login = Login::new(
            Arc::clone(&auth),
            Arc::clone(&accounts),
            Arc::clone(&tokens),
        );
        let register = Register::new(auth, Arc::clone(&accounts), Arc::clone(&tokens));
        Self {
            login: Arc::new(login),
            register: Arc::new(register),
            accounts,
            tokens,
        }
    }
}
