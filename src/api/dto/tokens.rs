use serde::{Deserialize, Serialize};

use crate::services::token_service::IssuedTokenPair;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    #[serde(default)]
    pub refresh_token: String,
}

impl ReissueRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.refresh_token.trim().is_empty() {
            return Err("refreshToken is required");
        }
        Ok(())
    }
}

/// Body of login and reissue responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
}

impl From<IssuedTokenPair> for TokenResponse {
    fn from(pair: IssuedTokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type.to_string(),
            expires_in: pair.expires_in,
        }
    }
}
