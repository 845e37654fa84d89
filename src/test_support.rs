//! Shared fixtures for unit and router tests.

use std::sync::Arc;

use crate::repos::memory::{MemoryTokenStore, MemoryUserStore};
use crate::services::auth::{PasswordEncoder, TokenProvider};
use crate::state::AppState;

/// 64 bytes, the HS512 minimum.
pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs512-signing-0123456789abcd";

pub fn test_provider() -> TokenProvider {
    TokenProvider::new(TEST_SECRET, 600, 3600, 0).expect("test secret should be accepted")
}

/// AppState over empty in-memory stores, bcrypt at the minimum cost.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(test_provider()),
        Arc::new(MemoryUserStore::default()),
        Arc::new(MemoryTokenStore::default()),
        PasswordEncoder::new(4),
    )
}
