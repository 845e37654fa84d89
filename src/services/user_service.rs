use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, ErrorCode};
use crate::repos::error::RepoError;
use crate::repos::token_repo::TokenStore;
use crate::repos::user_repo::{UserRow, UserStore};
use crate::services::auth::password::{PasswordEncoder, check_password_policy};
use crate::services::auth::TokenProvider;
use crate::services::token_service::{IssuedTokenPair, hash_refresh_token};

/// Sign-up, login and the authenticated user's profile.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    provider: Arc<TokenProvider>,
    encoder: PasswordEncoder,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("encoder", &self.encoder)
            .finish()
    }
}

/// Public view of a user (never carries the password hash).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub account: String,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            account: row.account,
        }
    }
}

fn duplicate_account() -> AppError {
    AppError::with_message(ErrorCode::DuplicateResource, "account already exists")
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        provider: Arc<TokenProvider>,
        encoder: PasswordEncoder,
    ) -> Self {
        Self {
            users,
            tokens,
            provider,
            encoder,
        }
    }

    /// Register a new account.
    ///
    /// The duplicate check runs before the password policy, so a taken account is
    /// reported even when the password is also weak.
    pub async fn sign_up(&self, account: &str, password: &str) -> Result<UserSummary, AppError> {
        if self.users.find_by_account(account).await?.is_some() {
            debug!(account, "sign-up rejected: account exists");
            return Err(duplicate_account());
        }

        check_password_policy(password)?;

        let password_hash = self.encoder.encode(password).await?;
        let row = self
            .users
            .insert(account, &password_hash)
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent sign-up for the same account.
                RepoError::Conflict => duplicate_account(),
                other => other.into(),
            })?;

        info!(user_id = %row.user_id, "user signed up");
        Ok(row.into())
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// The user's refresh token row is created on first login and overwritten afterwards.
    pub async fn login(&self, account: &str, password: &str) -> Result<IssuedTokenPair, AppError> {
        let user = self
            .users
            .find_by_account(account)
            .await?
            .ok_or_else(|| AppError::not_found("account does not exist"))?;

        if !self.encoder.matches(password, &user.password).await? {
            return Err(AppError::with_message(
                ErrorCode::InvalidPassword,
                "password does not match",
            ));
        }

        let refresh_token = self.provider.create_refresh_token()?;
        let row = self
            .tokens
            .upsert_for_user(user.user_id, hash_refresh_token(&refresh_token))
            .await?;

        let access_token = self.provider.create_access_token(user.user_id)?;

        info!(user_id = %user.user_id, token_id = row.token_id, "user logged in");

        Ok(IssuedTokenPair::bearer(
            access_token,
            refresh_token,
            self.provider.access_token_ttl_seconds(),
        ))
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserSummary, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| AppError::not_found("user does not exist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repos::memory::{MemoryTokenStore, MemoryUserStore};
    use crate::test_support::test_provider;

    struct Fixture {
        service: UserService,
        users: Arc<MemoryUserStore>,
        tokens: Arc<MemoryTokenStore>,
        provider: Arc<TokenProvider>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MemoryUserStore::default());
        let tokens = Arc::new(MemoryTokenStore::default());
        let provider = Arc::new(test_provider());
        let service = UserService::new(
            users.clone(),
            tokens.clone(),
            provider.clone(),
            PasswordEncoder::new(4),
        );
        Fixture {
            service,
            users,
            tokens,
            provider,
        }
    }

    #[tokio::test]
    async fn sign_up_stores_a_bcrypt_hash() {
        let f = fixture();

        let user = f.service.sign_up("alice", "password1").await.unwrap();
        assert_eq!(user.account, "alice");

        let row = f.users.get_by_account("alice").unwrap();
        assert_eq!(row.user_id, user.user_id);
        assert_ne!(row.password, "password1");
        assert!(bcrypt::verify("password1", &row.password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_is_checked_before_password_policy() {
        let f = fixture();
        f.service.sign_up("alice", "password1").await.unwrap();

        let err = f.service.sign_up("alice", "weak").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateResource);
    }

    #[tokio::test]
    async fn weak_password_is_not_stored() {
        let f = fixture();

        let err = f.service.sign_up("bob", "12345678").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPassword);
        assert!(f.users.get_by_account("bob").is_none());
    }

    #[tokio::test]
    async fn password_past_bcrypt_limit_is_refused() {
        let f = fixture();
        let base = "p4".repeat(36);

        let err = f
            .service
            .sign_up("dave", &format!("{base}RIGHT"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPassword);
        assert!(f.users.get_by_account("dave").is_none());

        f.service.sign_up("dave", &base).await.unwrap();
        let err = f
            .service
            .login("dave", &format!("{base}WRONG"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPassword);
    }

    #[tokio::test]
    async fn login_issues_pair_and_keeps_one_token_row() {
        let f = fixture();
        let user = f.service.sign_up("alice", "password1").await.unwrap();

        let first = f.service.login("alice", "password1").await.unwrap();
        let second = f.service.login("alice", "password1").await.unwrap();

        assert_eq!(
            f.provider.user_id_from_token(&second.access_token),
            Ok(user.user_id)
        );
        assert_ne!(first.refresh_token, second.refresh_token);

        let rows = f.tokens.rows_for_user(user.user_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].refresh_token_hash,
            hash_refresh_token(&second.refresh_token)
        );
    }

    #[tokio::test]
    async fn login_failures() {
        let f = fixture();
        f.service.sign_up("alice", "password1").await.unwrap();

        let err = f.service.login("nobody", "password1").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EntityNotFound);

        let err = f.service.login("alice", "password2").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPassword);
    }

    #[tokio::test]
    async fn me_returns_the_account() {
        let f = fixture();
        let user = f.service.sign_up("alice", "password1").await.unwrap();

        assert_eq!(f.service.me(user.user_id).await.unwrap(), user);

        let err = f.service.me(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EntityNotFound);
    }
}
