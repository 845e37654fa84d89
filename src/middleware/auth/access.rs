//! Access token check for every non-public route.
//!
//! - `Authorization: Bearer <jwt>` is verified with the TokenProvider.
//! - On success the user id from `sub` is stored as AuthCtx in the request extensions.
//! - A missing header is UNAUTHORIZED_ACCESS; an invalid token short-circuits with its own code.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

/// Reachable without an access token (exact match).
pub const PUBLIC_PATHS: [&str; 4] = [
    "/health",
    "/api/users/sign-up",
    "/api/users/login",
    "/api/tokens/reissue",
];

const BEARER_PREFIX: &str = "Bearer ";

/// Apply the access check to the whole router, fallback included, so unknown
/// paths are also answered 401 for anonymous callers.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8: the State extractor inside middleware needs from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Token part of `Authorization: Bearer <token>`.
///
/// None when the header is absent, not ASCII, uses another scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(req.headers()) else {
        tracing::debug!(path = %req.uri().path(), "no bearer token");
        return Err(AppError::new(ErrorCode::UnauthorizedAccess));
    };

    let user_id = match state.provider.user_id_from_token(token) {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!(error = %err, path = %req.uri().path(), "access token rejected");
            return Err(err.into());
        }
    };

    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}
