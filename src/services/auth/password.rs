//! bcrypt password hashing and the sign-up password policy.
//!
//! bcrypt is CPU bound, so hashing and verification run on the blocking pool.

use tokio::task;
use tracing::error;

use crate::error::{AppError, ErrorCode};

const MIN_PASSWORD_CHARS: usize = 8;
/// bcrypt only reads this many bytes of its input.
const MAX_PASSWORD_BYTES: usize = 72;
const SPECIAL_CHARS: &str = "!@#$%^&*";

#[derive(Debug, Clone, Copy)]
pub struct PasswordEncoder {
    cost: u32,
}

impl PasswordEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn encode(&self, raw: &str) -> Result<String, AppError> {
        let raw = raw.to_owned();
        let cost = self.cost;

        task::spawn_blocking(move || bcrypt::hash(raw, cost))
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                error!(error = %e, "failed to hash password");
                AppError::Internal
            })
    }

    pub async fn matches(&self, raw: &str, hash: &str) -> Result<bool, AppError> {
        // Never stored, and bcrypt would compare only its first 72 bytes.
        if raw.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        let raw = raw.to_owned();
        let hash = hash.to_owned();

        task::spawn_blocking(move || bcrypt::verify(raw, &hash))
            .await
            .map_err(|e| {
                error!(error = %e, "password verification task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                // A stored hash that bcrypt cannot parse is a data problem, not a wrong password.
                error!(error = %e, "failed to verify password hash");
                AppError::Internal
            })
    }
}

/// Rules, checked in order:
/// 1. at least 8 characters
/// 2. not made only of digits and whitespace
/// 3. at most 72 bytes (UTF-8)
/// 4. at least two of: ASCII letter, digit, special character (`!@#$%^&*`)
pub fn check_password_policy(raw: &str) -> Result<(), AppError> {
    if raw.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::with_message(
            ErrorCode::InvalidPassword,
            "password must be at least 8 characters",
        ));
    }

    if raw
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_whitespace())
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidPassword,
            "password cannot consist only of digits or whitespace",
        ));
    }

    if raw.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::with_message(
            ErrorCode::InvalidPassword,
            "password must be at most 72 bytes",
        ));
    }

    let has_letter = raw.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = raw.chars().any(|c| c.is_ascii_digit());
    let has_special = raw.chars().any(|c| SPECIAL_CHARS.contains(c));

    let classes = [has_letter, has_digit, has_special]
        .into_iter()
        .filter(|present| *present)
        .count();

    if classes < 2 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPassword,
            "password must contain at least two of letters, digits and special characters",
        ));
    }

    Ok(())
}
