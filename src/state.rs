/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - provider: TokenProvider for the access middleware
 *   - users / tokens: services used by the handlers
 * - Cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::repos::{token_repo::TokenStore, user_repo::UserStore};
use crate::services::auth::{PasswordEncoder, TokenProvider};
use crate::services::{token_service::TokenService, user_service::UserService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub provider: Arc<TokenProvider>,
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        provider: Arc<TokenProvider>,
        user_store: Arc<dyn UserStore>,
        token_store: Arc<dyn TokenStore>,
        encoder: PasswordEncoder,
    ) -> Self {
        let users = UserService::new(
            user_store,
            token_store.clone(),
            provider.clone(),
            encoder,
        );
        let tokens = TokenService::new(token_store, provider.clone());

        Self {
            provider,
            users: Arc::new(users),
            tokens: Arc::new(tokens),
        }
    }
}
