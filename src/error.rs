/*
 * Responsibility
 * - ErrorCode: every failure the API reports, with its HTTP status and default message
 * - AppError: the one error type returned by handlers, services and middleware
 * - IntoResponse (HTTP status / JSON error body)
 * - RepoError / TokenError / JsonRejection are converted here
 */
use std::fmt;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::jwt::TokenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidInputValue,
    InvalidParameter,
    EntityNotFound,
    DuplicateResource,
    InternalServerError,

    // sign-up / login
    InvalidPassword,

    // authentication
    UnauthorizedAccess,
    TokenExpired,
    TokenMalformed,
    TokenBadSignature,
    TokenUnsupported,
    TokenMissingUserId,
    InvalidRefreshToken,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidInputValue | Self::InvalidParameter | Self::InvalidPassword => {
                StatusCode::BAD_REQUEST
            }
            Self::EntityNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateResource => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnauthorizedAccess
            | Self::TokenExpired
            | Self::TokenMalformed
            | Self::TokenBadSignature
            | Self::TokenUnsupported
            | Self::TokenMissingUserId
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInputValue => "INVALID_INPUT_VALUE",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::EntityNotFound => "ENTITY_NOT_FOUND",
            Self::DuplicateResource => "DUPLICATE_RESOURCE",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenBadSignature => "TOKEN_BAD_SIGNATURE",
            Self::TokenUnsupported => "TOKEN_UNSUPPORTED",
            Self::TokenMissingUserId => "TOKEN_MISSING_USER_ID",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidInputValue => "check the input values",
            Self::InvalidParameter => "check the request parameters",
            Self::EntityNotFound => "entity does not exist",
            Self::DuplicateResource => "resource already exists",
            Self::InternalServerError => "internal server error",
            Self::InvalidPassword => "password does not satisfy the password policy",
            Self::UnauthorizedAccess => "authentication is required",
            Self::TokenExpired => "token has expired",
            Self::TokenMalformed => "token is malformed",
            Self::TokenBadSignature => "token signature is invalid",
            Self::TokenUnsupported => "token algorithm is not supported",
            Self::TokenMissingUserId => "token does not carry a user id",
            Self::InvalidRefreshToken => "refresh token is invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    Domain { code: ErrorCode, message: String },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidInputValue, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::EntityNotFound, message)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Domain { code, .. } => *code,
            Self::Token(e) => e.code(),
            Self::Internal => ErrorCode::InternalServerError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = match self {
            AppError::Domain { message, .. } => message,
            AppError::Token(e) => e.to_string(),
            AppError::Internal => code.default_message().to_string(),
        };

        if code.status().is_server_error() {
            tracing::error!(code = %code, %message, "request failed");
        } else {
            tracing::warn!(code = %code, %message, "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.as_str(),
                message,
            },
        };

        (code.status(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::new(ErrorCode::DuplicateResource),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::with_message(ErrorCode::InvalidParameter, rejection.body_text())
    }
}
