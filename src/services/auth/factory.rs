/// Factories: build the auth primitives from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{PasswordEncoder, TokenProvider};

pub fn build_token_provider(config: &Config) -> Result<Arc<TokenProvider>, AppError> {
    let provider = TokenProvider::new(
        &config.jwt_secret_key,
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_seconds,
        config.jwt_leeway_seconds,
    )?;

    Ok(Arc::new(provider))
}

pub fn build_password_encoder(config: &Config) -> PasswordEncoder {
    PasswordEncoder::new(config.bcrypt_cost)
}
