//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed configuration, the account registry, and the token
//! signer. Everything is behind `Arc` so cloning per request is cheap.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::accounts::AccountStore;
use crate::services::token::TokenSigner;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub accounts: Arc<AccountStore>,
    pub tokens: Arc<TokenSigner>,
}

impl AppState {
    /// State with the demo account seeded.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let tokens = TokenSigner::new(&config.jwt_secret, config.jwt_ttl);
        Self {
            config: Arc::new(config),
            accounts: Arc::new(AccountStore::seeded()),
            tokens: Arc::new(tokens),
        }
    }
}
