//! HS512 JWT issuance and validation for access and refresh tokens.
//!
//! - Access tokens carry the user id as `sub`.
//! - Refresh tokens carry no subject; the stored token row ties them to a user.
//! - Both carry a random `jti`, so two tokens minted in the same second still differ.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{AppError, ErrorCode};

/// HS512 keys shorter than the hash output (512 bits) are rejected.
pub const MIN_SECRET_BYTES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token algorithm is not supported")]
    UnsupportedAlgorithm,
    #[error("token does not carry a user id")]
    MissingSubject,
}

impl TokenError {
    pub fn code(self) -> ErrorCode {
        match self {
            Self::Empty | Self::Malformed => ErrorCode::TokenMalformed,
            Self::Expired => ErrorCode::TokenExpired,
            Self::BadSignature => ErrorCode::TokenBadSignature,
            Self::UnsupportedAlgorithm => ErrorCode::TokenUnsupported,
            Self::MissingSubject => ErrorCode::TokenMissingUserId,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::UnsupportedAlgorithm,
            _ => Self::Malformed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenProvider")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenProvider {
    pub fn new(
        secret: &str,
        access_ttl_seconds: u64,
        refresh_ttl_seconds: u64,
        leeway_seconds: u64,
    ) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_BYTES {
            warn!(
                len = secret.len(),
                min = MIN_SECRET_BYTES,
                "JWT secret is too short for HS512"
            );
            return Err(AppError::Internal);
        }

        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl_seconds,
            refresh_ttl_seconds,
        })
    }

    pub fn access_token_ttl_seconds(&self) -> u64 {
        self.access_ttl_seconds
    }

    pub fn create_access_token(&self, user_id: Uuid) -> Result<String, AppError> {
        self.sign(Some(user_id.to_string()), self.access_ttl_seconds)
    }

    pub fn create_refresh_token(&self) -> Result<String, AppError> {
        self.sign(None, self.refresh_ttl_seconds)
    }

    fn sign(&self, sub: Option<String>, ttl_seconds: u64) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let exp = i64::try_from(ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds, "token lifetime does not fit a timestamp");
                AppError::Internal
            })?;
        let claims = Claims {
            sub,
            iat: Some(now),
            exp,
            jti: Some(Uuid::new_v4().to_string()),
        };

        let mut header = Header::new(Algorithm::HS512);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }

    /// Checks signature, algorithm and expiry.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            debug!("JWT is empty");
            return Err(TokenError::Empty);
        }

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let err = TokenError::from(e);
                debug!(error = %err, "JWT validation failed");
                err
            })
    }

    /// Validates the token and returns its subject as a user id.
    pub fn user_id_from_token(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.validate_token(token)?;

        claims
            .sub
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(TokenError::MissingSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use jsonwebtoken::encode;

    use crate::test_support::{TEST_SECRET, test_provider};

    fn sign_with(alg: Algorithm, secret: &str, claims: &Claims) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    fn claims_expiring_at(exp: i64, sub: Option<String>) -> Claims {
        Claims {
            sub,
            iat: Some(exp - 60),
            exp,
            jti: None,
        }
    }

    #[test]
    fn access_token_carries_user_id() {
        let provider = test_provider();
        let user_id = Uuid::new_v4();

        let token = provider.create_access_token(user_id).unwrap();

        assert_eq!(provider.user_id_from_token(&token), Ok(user_id));
        let claims = provider.validate_token(&token).unwrap();
        assert!(claims.exp > claims.iat.unwrap());
        assert!(claims.jti.is_some());
    }

    #[test]
    fn refresh_token_has_no_subject() {
        let provider = test_provider();
        let token = provider.create_refresh_token().unwrap();

        let claims = provider.validate_token(&token).unwrap();
        assert!(claims.sub.is_none());
        assert_eq!(
            provider.user_id_from_token(&token),
            Err(TokenError::MissingSubject)
        );
    }

    #[test]
    fn refresh_tokens_minted_together_differ() {
        let provider = test_provider();
        let a = provider.create_refresh_token().unwrap();
        let b = provider.create_refresh_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let provider = test_provider();
        // Well past any leeway.
        let exp = Utc::now().timestamp() - 300;
        let token = sign_with(
            Algorithm::HS512,
            TEST_SECRET,
            &claims_expiring_at(exp, Some(Uuid::new_v4().to_string())),
        );

        assert_matches!(provider.validate_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn foreign_secret_is_a_bad_signature() {
        let provider = test_provider();
        let other = "x".repeat(MIN_SECRET_BYTES);
        let exp = Utc::now().timestamp() + 300;
        let token = sign_with(Algorithm::HS512, &other, &claims_expiring_at(exp, None));

        assert_matches!(
            provider.validate_token(&token),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn other_algorithm_is_unsupported() {
        let provider = test_provider();
        let exp = Utc::now().timestamp() + 300;
        let token = sign_with(Algorithm::HS256, TEST_SECRET, &claims_expiring_at(exp, None));

        assert_matches!(
            provider.validate_token(&token),
            Err(TokenError::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn garbage_and_blank_tokens() {
        let provider = test_provider();

        assert_matches!(provider.validate_token("not.a.jwt"), Err(TokenError::Malformed));
        assert_matches!(provider.validate_token("abc"), Err(TokenError::Malformed));
        assert_matches!(provider.validate_token("   "), Err(TokenError::Empty));
    }

    #[test]
    fn non_uuid_subject_is_missing_user_id() {
        let provider = test_provider();
        let exp = Utc::now().timestamp() + 300;
        let token = sign_with(
            Algorithm::HS512,
            TEST_SECRET,
            &claims_expiring_at(exp, Some("alice".to_string())),
        );

        assert_eq!(
            provider.user_id_from_token(&token),
            Err(TokenError::MissingSubject)
        );
    }

    #[test]
    fn oversized_lifetime_fails_instead_of_expiring() {
        let provider = TokenProvider::new(TEST_SECRET, u64::MAX, i64::MAX as u64, 0).unwrap();

        assert_matches!(
            provider.create_access_token(Uuid::new_v4()),
            Err(AppError::Internal)
        );
        assert_matches!(provider.create_refresh_token(), Err(AppError::Internal));
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = TokenProvider::new("too-short", 60, 60, 0);
        assert_matches!(result, Err(AppError::Internal));
    }

    #[test]
    fn every_failure_has_an_unauthorized_code() {
        let failures = [
            (TokenError::Expired, ErrorCode::TokenExpired),
            (TokenError::Malformed, ErrorCode::TokenMalformed),
            (TokenError::BadSignature, ErrorCode::TokenBadSignature),
            (TokenError::UnsupportedAlgorithm, ErrorCode::TokenUnsupported),
            (TokenError::MissingSubject, ErrorCode::TokenMissingUserId),
        ];

        for (err, code) in failures {
            assert_eq!(err.code(), code);
            assert_eq!(code.status(), axum::http::StatusCode::UNAUTHORIZED);
        }
    }
}
