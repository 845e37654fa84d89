use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{AppError, ErrorCode};
use crate::repos::token_repo::TokenStore;
use crate::services::auth::{TokenError, TokenProvider};

/// Service that reissues token pairs from a refresh token.
///
/// - TokenProvider validates the presented refresh token and mints the new pair.
/// - TokenStore holds the single refresh token row of each user; reissue overwrites it.
#[derive(Clone)]
pub struct TokenService {
    tokens: Arc<dyn TokenStore>,
    provider: Arc<TokenProvider>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("provider", &self.provider)
            .finish()
    }
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenStore>, provider: Arc<TokenProvider>) -> Self {
        Self { tokens, provider }
    }

    /// Reissue an access token and rotate the refresh token.
    ///
    /// - an expired refresh token is reported as such; any other failure is an invalid refresh token
    /// - the refresh token must match the user's stored row
    /// - the stored value is overwritten, so the presented token cannot be used again
    pub async fn reissue(&self, refresh_token: &str) -> Result<IssuedTokenPair, AppError> {
        if let Err(e) = self.provider.validate_token(refresh_token) {
            debug!(error = %e, "refresh token rejected");
            return Err(match e {
                TokenError::Expired => AppError::Token(TokenError::Expired),
                _ => AppError::new(ErrorCode::InvalidRefreshToken),
            });
        }

        let current_hash = hash_refresh_token(refresh_token);
        let row = self
            .tokens
            .find_by_refresh_token_hash(&current_hash)
            .await?
            .ok_or_else(|| AppError::not_found("no stored token matches the refresh token"))?;
        debug!(token_id = row.token_id, last_rotated_at = %row.updated_at, "rotating refresh token");

        let access_token = self.provider.create_access_token(row.user_id)?;
        let refresh_token = self.provider.create_refresh_token()?;

        let rotated = self
            .tokens
            .rotate(row.token_id, &current_hash, hash_refresh_token(&refresh_token))
            .await?;
        if !rotated {
            warn!(token_id = row.token_id, user_id = %row.user_id, "refresh token was rotated concurrently");
            return Err(AppError::new(ErrorCode::InvalidRefreshToken));
        }

        info!(user_id = %row.user_id, "refresh token rotated");

        Ok(IssuedTokenPair::bearer(
            access_token,
            refresh_token,
            self.provider.access_token_ttl_seconds(),
        ))
    }
}

/// Service-level return type to keep handlers thin.
///
/// Handlers map this into the HTTP DTO (TokenResponse).
#[derive(Clone, Debug)]
pub struct IssuedTokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

impl IssuedTokenPair {
    pub fn bearer(access_token: String, refresh_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in,
        }
    }
}

/// sha256(token) -> raw 32 bytes (stored as BYTEA)
pub fn hash_refresh_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
