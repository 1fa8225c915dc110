//! Store wiring and shared application state.

use std::sync::Arc;

use axum::http::HeaderName;

use carlot_auth::TokenService;
use carlot_store::{
    InMemoryListingStore, InMemoryRevocationStore, InMemoryUserStore, ListingStore,
    RevocationStore, UserStore,
};

use crate::config::ApiConfig;
use crate::gate::AuthGate;

/// Shared state handed to every handler.
///
/// Stores are trait objects so a persistent backend can be swapped in without
/// touching the routes.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub revoked: Arc<dyn RevocationStore>,
    pub listings: Arc<dyn ListingStore>,
    pub gate: Arc<AuthGate>,
    pub token_header: HeaderName,
}

pub fn build_state(config: &ApiConfig) -> AppState {
    let tokens = Arc::new(TokenService::new(config.jwt_secret.as_bytes()));
    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let revoked: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationStore::new());
    let listings: Arc<dyn ListingStore> = Arc::new(InMemoryListingStore::new());

    let gate = Arc::new(AuthGate::new(
        tokens.clone(),
        revoked.clone(),
        users.clone(),
    ));

    let token_header = HeaderName::try_from(config.token_header.to_ascii_lowercase())
        .unwrap_or_else(|e| panic!("invalid TOKEN_HEADER '{}': {e}", config.token_header));

    AppState {
        tokens,
        users,
        revoked,
        listings,
        gate,
        token_header,
    }
}
