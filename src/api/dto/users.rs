/*
 * Responsibility
 * - Request/response DTOs of /api/users
 * - validate(): field-level checks before the service runs
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::user_service::UserSummary;

const MAX_ACCOUNT_CHARS: usize = 50;
const MAX_PASSWORD_CHARS: usize = 100;

// Missing fields deserialize to "" so they are reported by validate(), not by the JSON parser.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub password: String,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.account.trim().is_empty() {
            return Err("account is required");
        }
        if self.account.chars().count() > MAX_ACCOUNT_CHARS {
            return Err("account must be <= 50 chars");
        }
        if self.password.trim().is_empty() {
            return Err("password is required");
        }
        if self.password.chars().count() > MAX_PASSWORD_CHARS {
            return Err("password must be <= 100 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.account.trim().is_empty() {
            return Err("account is required");
        }
        if self.password.trim().is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: Uuid,
    pub account: String,
}

impl From<UserSummary> for UserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            user_id: user.user_id,
            account: user.account,
        }
    }
}
